//! Power management abstraction
//!
//! Provides the wake-source interface: marking a device as able to wake the
//! host, and arming individual interrupts as wake sources.

use crate::gpio::IrqNumber;

/// Wake-source control
pub trait WakeControl {
    /// Error type
    type Error: core::fmt::Debug;

    /// Mark (or unmark) the device as wake-capable.
    fn set_wakeup_capable(&mut self, enable: bool);

    /// Arm `irq` so that it can bring the host out of a low-power state.
    fn enable_irq_wake(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Disarm `irq` as a wake source.
    fn disable_irq_wake(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;
}

/// Wake-up source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeSource {
    /// Line interrupt
    Irq(IrqNumber),
    /// Not a wake source
    None,
}

impl WakeSource {
    /// Whether this source can wake the host.
    pub fn is_armed(self) -> bool {
        matches!(self, Self::Irq(_))
    }
}
