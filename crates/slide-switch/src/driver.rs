//! Registrar-facing driver.
//!
//! The device registrar hands every discovered node to [`SlideSwitchDriver::probe`]
//! and calls [`SlideSwitchDriver::remove`] when the node goes away or the driver
//! is unloaded. The driver owns the collaborators and at most one bound
//! [`SlideSwitch`]; there is no global device table.

use platform::devicetree::DeviceNode;
use platform::gpio::LineProvider;
use platform::input::InputRegistry;
use platform::power::WakeControl;

use crate::error::SwitchError;
use crate::lifecycle::SlideSwitch;

/// Switch bound by a driver over these collaborators.
pub type BoundSwitch<P, R> =
    SlideSwitch<<P as LineProvider>::Line, <R as InputRegistry>::Sink>;

/// Slide switch driver.
pub struct SlideSwitchDriver<P, R, W>
where
    P: LineProvider,
    R: InputRegistry,
{
    lines: P,
    inputs: R,
    power: W,
    switch: Option<BoundSwitch<P, R>>,
}

impl<P, R, W> SlideSwitchDriver<P, R, W>
where
    P: LineProvider,
    R: InputRegistry,
    W: WakeControl,
{
    /// Compatible string the driver binds to.
    pub const COMPATIBLE: &'static str = "slide_button";

    /// Create an unbound driver.
    pub fn new(lines: P, inputs: R, power: W) -> Self {
        Self {
            lines,
            inputs,
            power,
            switch: None,
        }
    }

    /// Whether `node` describes a slide switch.
    pub fn matches<N: DeviceNode + ?Sized>(node: &N) -> bool {
        node.is_compatible(Self::COMPATIBLE)
    }

    /// Bind the switch described by `node`.
    pub fn probe<N: DeviceNode + ?Sized>(&mut self, node: &N) -> Result<(), SwitchError> {
        if !Self::matches(node) {
            return Err(SwitchError::NotCompatible);
        }
        if self.switch.is_some() {
            warn!("slide switch: probe while already attached");
            return Err(SwitchError::AlreadyAttached);
        }
        let switch = SlideSwitch::attach(node, &mut self.lines, &mut self.inputs, &mut self.power)?;
        self.switch = Some(switch);
        Ok(())
    }

    /// Unbind the switch. Does nothing if none is bound.
    pub fn remove(&mut self) {
        if let Some(switch) = self.switch.take() {
            switch.detach(&mut self.lines, &mut self.inputs, &mut self.power);
        }
    }

    /// Whether a switch is bound.
    pub fn is_bound(&self) -> bool {
        self.switch.is_some()
    }

    /// Bound switch, for running its edge task.
    pub fn switch_mut(&mut self) -> Option<&mut BoundSwitch<P, R>> {
        self.switch.as_mut()
    }

    /// Bound switch.
    pub fn switch(&self) -> Option<&BoundSwitch<P, R>> {
        self.switch.as_ref()
    }

    /// Line provider.
    pub fn lines(&self) -> &P {
        &self.lines
    }

    /// Input registry.
    pub fn inputs(&self) -> &R {
        &self.inputs
    }

    /// Wake-source controller.
    pub fn power(&self) -> &W {
        &self.power
    }
}
