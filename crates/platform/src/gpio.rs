//! GPIO line and interrupt abstraction layer
//!
//! A switch line is an [`embedded_hal::digital::InputPin`] that can also be
//! awaited for edges ([`embedded_hal_async::digital::Wait`]). [`InterruptLine`]
//! adds registration of edge delivery on top of those two traits, and
//! [`LineProvider`] is the collaborator that hands lines out and takes them
//! back.

use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// Identifier of a physical input line.
///
/// Device descriptions encode "no valid line" as a negative number, so the
/// only way to get a `LineId` from raw description data is
/// [`LineId::from_raw`], which rejects those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct LineId(u32);

impl LineId {
    /// Wrap a known-valid line number.
    #[must_use]
    pub const fn new(line: u32) -> Self {
        Self(line)
    }

    /// Validate a raw line number read from a device description.
    ///
    /// Returns `None` for negative values.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// Return the line number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifier of the interrupt bound to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct IrqNumber(u32);

impl IrqNumber {
    /// Wrap an interrupt number.
    #[must_use]
    pub const fn new(irq: u32) -> Self {
        Self(irq)
    }

    /// Return the interrupt number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// External interrupt configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptMode {
    /// Trigger on rising edge
    RisingEdge,
    /// Trigger on falling edge
    FallingEdge,
    /// Trigger on both edges
    BothEdges,
}

/// Input line with interrupt capability.
///
/// Edges are consumed through [`Wait`] from a deferred task, never from raw
/// interrupt context, so [`InputPin::is_high`] is allowed to block.
pub trait InterruptLine: InputPin + Wait {
    /// Register edge delivery for `mode`.
    fn enable_interrupt(&mut self, mode: InterruptMode) -> Result<(), Self::Error>;

    /// Deregister edge delivery.
    ///
    /// Once this returns, no further edges are delivered for this line.
    fn disable_interrupt(&mut self) -> Result<(), Self::Error>;
}

/// Hands out exclusively owned input lines.
pub trait LineProvider {
    /// Line handle type
    type Line: InterruptLine;

    /// Error type
    type Error: core::fmt::Debug;

    /// Acquire exclusive ownership of `line`.
    ///
    /// `label` names the consumer for diagnostics.
    fn request(&mut self, line: LineId, label: &'static str) -> Result<Self::Line, Self::Error>;

    /// Resolve the interrupt bound to an acquired line.
    fn to_irq(&mut self, line: &Self::Line) -> Result<IrqNumber, Self::Error>;

    /// Give a line back.
    fn free(&mut self, line: Self::Line);
}
