//! Transition reporter: the edge handler body.
//!
//! ```text
//!            level read == committed
//!          ┌──────────────────────────┐
//!          ▼                          │
//!   [Off] ──read On──▶ emit KEY_SLIDE_ON pair  ──▶ [On]
//!   [On]  ──read Off─▶ emit KEY_SLIDE_OFF pair ──▶ [Off]
//! ```
//!
//! Every edge, rising or falling, triggers one re-read of the line. The edge
//! polarity itself is never trusted: if the level matches the committed
//! position the edge was bounce and nothing is emitted. A real transition
//! emits press, sync, release, sync for the new position's key and only then
//! commits the new position.

use platform::gpio::InterruptLine;
use platform::input::InputSink;

use crate::keymap::SwitchState;
use crate::monitor::LineMonitor;

/// Result of handling one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// The switch moved; one press/release pair was emitted for this position
    Reported(SwitchState),
    /// Level matches the committed position; nothing emitted
    Unchanged,
    /// The level could not be read; nothing emitted, position unchanged
    ReadFailed,
}

/// Tracks the last committed switch position.
///
/// Invocations must be serialized; the caller's `&mut` access provides that.
#[derive(Debug, Default)]
pub struct TransitionReporter {
    committed: SwitchState,
}

impl TransitionReporter {
    /// Start with the switch assumed off.
    ///
    /// No level is read up front: a switch that is already on at attach
    /// reports nothing until the first edge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last committed position.
    pub fn committed(&self) -> SwitchState {
        self.committed
    }

    /// Handle one edge.
    pub fn on_edge<L, S>(&mut self, monitor: &mut LineMonitor<L>, sink: &mut S) -> EdgeOutcome
    where
        L: InterruptLine,
        S: InputSink,
    {
        let state = match monitor.read_level() {
            Ok(state) => state,
            Err(_) => {
                warn!("slide switch: level read failed, edge ignored");
                return EdgeOutcome::ReadFailed;
            }
        };

        if state == self.committed {
            trace!("slide switch: spurious edge, still {}", state.as_str());
            return EdgeOutcome::Unchanged;
        }

        debug!("slide switch: slider is now {}", state.as_str());
        sink.report_tap(state.keycode());
        self.committed = state;
        EdgeOutcome::Reported(state)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::keymap::{KEY_SLIDE_OFF, KEY_SLIDE_ON};
    use platform::input::{InputRecord, InputRegistry, KeyEvent};
    use platform::mocks::{Journal, MockInputRegistry, MockLine, MockSink};

    fn harness(level: bool) -> (MockLine, LineMonitor<MockLine>, MockInputRegistry, MockSink) {
        let line = MockLine::new(level);
        let mut registry = MockInputRegistry::new(Journal::new());
        let sink = registry.register(&crate::keymap::device_info().unwrap()).unwrap();
        (line.clone(), LineMonitor::new(line), registry, sink)
    }

    #[test]
    fn off_to_on_emits_one_on_pair() {
        let (_line, mut monitor, registry, mut sink) = harness(true);
        let mut reporter = TransitionReporter::new();

        assert_eq!(reporter.on_edge(&mut monitor, &mut sink), EdgeOutcome::Reported(SwitchState::On));
        assert_eq!(
            registry.records(),
            [
                InputRecord::Key(KeyEvent::press(KEY_SLIDE_ON)),
                InputRecord::Sync,
                InputRecord::Key(KeyEvent::release(KEY_SLIDE_ON)),
                InputRecord::Sync,
            ]
        );
        assert_eq!(reporter.committed(), SwitchState::On);
    }

    #[test]
    fn on_to_off_emits_one_off_pair() {
        let (line, mut monitor, registry, mut sink) = harness(true);
        let mut reporter = TransitionReporter::new();
        reporter.on_edge(&mut monitor, &mut sink);
        registry.clear_records();

        line.set_level(false);
        assert_eq!(reporter.on_edge(&mut monitor, &mut sink), EdgeOutcome::Reported(SwitchState::Off));
        assert_eq!(
            registry.key_events(),
            [KeyEvent::press(KEY_SLIDE_OFF), KeyEvent::release(KEY_SLIDE_OFF)]
        );
        assert_eq!(reporter.committed(), SwitchState::Off);
    }

    #[test]
    fn matching_level_is_a_no_op() {
        let (_line, mut monitor, registry, mut sink) = harness(false);
        let mut reporter = TransitionReporter::new();

        for _ in 0..5 {
            assert_eq!(reporter.on_edge(&mut monitor, &mut sink), EdgeOutcome::Unchanged);
        }
        assert!(registry.records().is_empty());
        assert_eq!(reporter.committed(), SwitchState::Off);
    }

    #[test]
    fn read_failure_emits_nothing_and_keeps_state() {
        let (line, mut monitor, registry, mut sink) = harness(true);
        let mut reporter = TransitionReporter::new();
        line.fail_reads(true);

        assert_eq!(reporter.on_edge(&mut monitor, &mut sink), EdgeOutcome::ReadFailed);
        assert!(registry.records().is_empty());
        assert_eq!(reporter.committed(), SwitchState::Off);

        // The next good read still reports the pending transition.
        line.fail_reads(false);
        assert_eq!(reporter.on_edge(&mut monitor, &mut sink), EdgeOutcome::Reported(SwitchState::On));
    }

    #[test]
    fn key_follows_level_read_not_previous_state() {
        let (line, mut monitor, registry, mut sink) = harness(true);
        let mut reporter = TransitionReporter::new();
        reporter.on_edge(&mut monitor, &mut sink);
        line.set_level(false);
        reporter.on_edge(&mut monitor, &mut sink);
        line.set_level(true);
        reporter.on_edge(&mut monitor, &mut sink);

        let presses: Vec<_> = registry
            .key_events()
            .into_iter()
            .filter(|ev| ev.pressed)
            .map(|ev| ev.code)
            .collect();
        assert_eq!(presses, [KEY_SLIDE_ON, KEY_SLIDE_OFF, KEY_SLIDE_ON]);
    }
}
