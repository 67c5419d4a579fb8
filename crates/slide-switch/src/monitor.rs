//! Line monitor: the only reader of the switch line.

use platform::gpio::InterruptLine;

use crate::keymap::SwitchState;

/// Owns the switch line and observes its level.
///
/// Only a lifecycle that successfully requested the line can build one, so
/// reads never touch a line that was not validly acquired.
pub struct LineMonitor<L> {
    line: L,
}

impl<L: InterruptLine> LineMonitor<L> {
    pub(crate) fn new(line: L) -> Self {
        Self { line }
    }

    /// Read the current switch position.
    ///
    /// May block; call from task context only. Has no side effects.
    pub fn read_level(&mut self) -> Result<SwitchState, L::Error> {
        self.line.is_high().map(SwitchState::from)
    }

    /// Wait for the next rising or falling edge.
    pub async fn wait_for_edge(&mut self) -> Result<(), L::Error> {
        self.line.wait_for_any_edge().await
    }

    pub(crate) fn line(&self) -> &L {
        &self.line
    }

    pub(crate) fn into_line(self) -> L {
        self.line
    }
}
