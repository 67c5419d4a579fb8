//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.
//!
//! Every mock is a cheap-to-clone handle over shared state: hand one clone to
//! the code under test and keep another to inspect or steer it. Mocks that
//! share a [`Journal`] record their calls into it in order, so tests can
//! assert on ordering across collaborators.

#![cfg(any(test, feature = "std"))]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin};
use embedded_hal_async::digital::Wait;

use crate::gpio::{InterruptLine, InterruptMode, IrqNumber, LineId, LineProvider};
use crate::input::{InputDeviceInfo, InputRecord, InputRegistry, InputSink, KeyCode, KeyEvent};
use crate::power::WakeControl;

/// Maximum number of edges that can be queued on a [`MockLine`].
pub const EDGE_QUEUE_DEPTH: usize = 32;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Journal ──────────────────────────────────────────────────────────────────

/// One collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Line handed out
    LineRequested(LineId),
    /// Line given back
    LineFreed(LineId),
    /// Interrupt number resolved for a line
    IrqResolved(IrqNumber),
    /// Edge delivery registered
    InterruptEnabled(InterruptMode),
    /// Edge delivery deregistered
    InterruptDisabled,
    /// Input device registered
    InputRegistered,
    /// Input device unregistered
    InputUnregistered,
    /// Device wakeup marking changed
    WakeupCapable(bool),
    /// Interrupt armed as wake source
    IrqWakeEnabled(IrqNumber),
    /// Interrupt disarmed as wake source
    IrqWakeDisabled(IrqNumber),
}

/// Ordered record of collaborator calls, shared between mocks.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Op>>>);

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation
    pub fn record(&self, op: Op) {
        lock(&self.0).push(op);
    }

    /// Snapshot of all recorded operations
    pub fn ops(&self) -> Vec<Op> {
        lock(&self.0).clone()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        lock(&self.0).clear();
    }

    /// Index of the first occurrence of `op`
    pub fn position(&self, op: Op) -> Option<usize> {
        lock(&self.0).iter().position(|o| *o == op)
    }
}

// ── Line ─────────────────────────────────────────────────────────────────────

/// Errors raised by [`MockLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLineError {
    /// Level read failed (injected)
    ReadFailed,
    /// Edge registration failed (injected)
    InterruptSetupFailed,
}

impl embedded_hal::digital::Error for MockLineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

struct LineState {
    level: bool,
    fail_reads: bool,
    fail_interrupt: bool,
    interrupt: Option<InterruptMode>,
    reads: usize,
}

struct LineShared {
    state: Mutex<LineState>,
    edges: Channel<CriticalSectionRawMutex, bool, EDGE_QUEUE_DEPTH>,
}

/// Mock input line.
///
/// Edges are queued with the level the line settles at; a waiter that picks
/// up an edge applies that level before returning, so the level observed by
/// the edge handler is the one queued with that edge.
#[derive(Clone)]
pub struct MockLine {
    shared: Arc<LineShared>,
    journal: Option<Journal>,
    bound: Option<LineId>,
}

impl MockLine {
    /// Create a line resting at `level`
    pub fn new(level: bool) -> Self {
        Self {
            shared: Arc::new(LineShared {
                state: Mutex::new(LineState {
                    level,
                    fail_reads: false,
                    fail_interrupt: false,
                    interrupt: None,
                    reads: 0,
                }),
                edges: Channel::new(),
            }),
            journal: None,
            bound: None,
        }
    }

    /// Change the level without delivering an edge
    pub fn set_level(&self, level: bool) {
        lock(&self.shared.state).level = level;
    }

    /// Current level
    pub fn level(&self) -> bool {
        lock(&self.shared.state).level
    }

    /// Make subsequent reads fail (or succeed again)
    pub fn fail_reads(&self, fail: bool) {
        lock(&self.shared.state).fail_reads = fail;
    }

    /// Make edge registration fail (or succeed again)
    pub fn fail_interrupt_setup(&self, fail: bool) {
        lock(&self.shared.state).fail_interrupt = fail;
    }

    /// Deliver an edge that settles at `level`.
    ///
    /// Returns `false` if edge delivery is not registered or the queue is full.
    pub fn queue_edge(&self, level: bool) -> bool {
        if lock(&self.shared.state).interrupt.is_none() {
            return false;
        }
        self.shared.edges.try_send(level).is_ok()
    }

    /// Registered edge mode, if any
    pub fn interrupt_mode(&self) -> Option<InterruptMode> {
        lock(&self.shared.state).interrupt
    }

    /// Number of successful level reads
    pub fn read_count(&self) -> usize {
        lock(&self.shared.state).reads
    }

    /// Line id this handle was requested as
    pub fn bound_id(&self) -> Option<LineId> {
        self.bound
    }

    fn record(&self, op: Op) {
        if let Some(journal) = &self.journal {
            journal.record(op);
        }
    }

    async fn next_edge(&mut self) -> bool {
        let level = self.shared.edges.receive().await;
        lock(&self.shared.state).level = level;
        level
    }
}

impl ErrorType for MockLine {
    type Error = MockLineError;
}

impl InputPin for MockLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut state = lock(&self.shared.state);
        if state.fail_reads {
            return Err(MockLineError::ReadFailed);
        }
        state.reads = state.reads.saturating_add(1);
        Ok(state.level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

impl Wait for MockLine {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        while !self.is_high()? {
            self.next_edge().await;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        while self.is_high()? {
            self.next_edge().await;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        while !self.next_edge().await {}
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        while self.next_edge().await {}
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.next_edge().await;
        Ok(())
    }
}

impl InterruptLine for MockLine {
    fn enable_interrupt(&mut self, mode: InterruptMode) -> Result<(), Self::Error> {
        {
            let mut state = lock(&self.shared.state);
            if state.fail_interrupt {
                return Err(MockLineError::InterruptSetupFailed);
            }
            state.interrupt = Some(mode);
        }
        self.record(Op::InterruptEnabled(mode));
        Ok(())
    }

    fn disable_interrupt(&mut self) -> Result<(), Self::Error> {
        lock(&self.shared.state).interrupt = None;
        // Pending edges die with the registration.
        while self.shared.edges.try_receive().is_ok() {}
        self.record(Op::InterruptDisabled);
        Ok(())
    }
}

// ── Line provider ────────────────────────────────────────────────────────────

/// Errors raised by [`MockLineProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProviderError {
    /// No line with this id exists
    NoSuchLine(LineId),
    /// Line is already handed out
    Busy(LineId),
    /// Interrupt lookup failed
    NoIrq,
}

struct ProviderState {
    lines: BTreeMap<LineId, MockLine>,
    outstanding: Vec<LineId>,
    fail_to_irq: bool,
    irq_base: u32,
}

/// Mock line provider.
///
/// A line can be handed out once until it is freed, so a leaked line makes
/// the next request for it fail with [`MockProviderError::Busy`].
#[derive(Clone)]
pub struct MockLineProvider {
    state: Arc<Mutex<ProviderState>>,
    journal: Journal,
}

impl MockLineProvider {
    /// Interrupt numbers are `irq_base + line id`
    pub const DEFAULT_IRQ_BASE: u32 = 100;

    /// Create a provider with no lines
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProviderState {
                lines: BTreeMap::new(),
                outstanding: Vec::new(),
                fail_to_irq: false,
                irq_base: Self::DEFAULT_IRQ_BASE,
            })),
            journal,
        }
    }

    /// Make `line` available under `id`
    pub fn add_line(&self, id: LineId, line: MockLine) {
        lock(&self.state).lines.insert(id, line);
    }

    /// Make interrupt lookup fail (or succeed again)
    pub fn fail_to_irq(&self, fail: bool) {
        lock(&self.state).fail_to_irq = fail;
    }

    /// Whether `id` is currently handed out
    pub fn is_outstanding(&self, id: LineId) -> bool {
        lock(&self.state).outstanding.contains(&id)
    }

    /// Number of lines currently handed out
    pub fn outstanding(&self) -> usize {
        lock(&self.state).outstanding.len()
    }
}

impl LineProvider for MockLineProvider {
    type Line = MockLine;
    type Error = MockProviderError;

    fn request(&mut self, id: LineId, _label: &'static str) -> Result<MockLine, Self::Error> {
        let mut state = lock(&self.state);
        if state.outstanding.contains(&id) {
            return Err(MockProviderError::Busy(id));
        }
        let template = state
            .lines
            .get(&id)
            .ok_or(MockProviderError::NoSuchLine(id))?;
        let line = MockLine {
            shared: Arc::clone(&template.shared),
            journal: Some(self.journal.clone()),
            bound: Some(id),
        };
        state.outstanding.push(id);
        self.journal.record(Op::LineRequested(id));
        Ok(line)
    }

    fn to_irq(&mut self, line: &MockLine) -> Result<IrqNumber, Self::Error> {
        let state = lock(&self.state);
        if state.fail_to_irq {
            return Err(MockProviderError::NoIrq);
        }
        let id = line.bound.ok_or(MockProviderError::NoIrq)?;
        let irq = state
            .irq_base
            .checked_add(id.get())
            .map(IrqNumber::new)
            .ok_or(MockProviderError::NoIrq)?;
        self.journal.record(Op::IrqResolved(irq));
        Ok(irq)
    }

    fn free(&mut self, line: MockLine) {
        if let Some(id) = line.bound {
            lock(&self.state).outstanding.retain(|o| *o != id);
            self.journal.record(Op::LineFreed(id));
        }
    }
}

// ── Input registry ───────────────────────────────────────────────────────────

/// Errors raised by [`MockInputRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockRegistryError {
    /// Registration rejected (injected)
    Rejected,
    /// A device is already registered
    Busy,
}

#[derive(Default)]
struct RegistryState {
    fail_register: bool,
    registered: Option<InputDeviceInfo>,
    records: Vec<InputRecord>,
}

/// Mock input registry recording everything its sink receives.
#[derive(Clone, Default)]
pub struct MockInputRegistry {
    state: Arc<Mutex<RegistryState>>,
    journal: Journal,
}

impl MockInputRegistry {
    /// Create a registry with no device
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
        }
    }

    /// Make registration fail (or succeed again)
    pub fn fail_register(&self, fail: bool) {
        lock(&self.state).fail_register = fail;
    }

    /// Description of the registered device, if any
    pub fn registered(&self) -> Option<InputDeviceInfo> {
        lock(&self.state).registered.clone()
    }

    /// Whether a device is registered
    pub fn is_registered(&self) -> bool {
        lock(&self.state).registered.is_some()
    }

    /// All records received, in order
    pub fn records(&self) -> Vec<InputRecord> {
        lock(&self.state).records.clone()
    }

    /// Key records only, in order
    pub fn key_events(&self) -> Vec<KeyEvent> {
        lock(&self.state)
            .records
            .iter()
            .filter_map(|r| match r {
                InputRecord::Key(ev) => Some(*ev),
                InputRecord::Sync => None,
            })
            .collect()
    }

    /// Forget received records
    pub fn clear_records(&self) {
        lock(&self.state).records.clear();
    }
}

/// Sink handed out by [`MockInputRegistry`].
pub struct MockSink {
    state: Arc<Mutex<RegistryState>>,
}

impl InputSink for MockSink {
    fn report_key(&mut self, code: KeyCode, pressed: bool) {
        lock(&self.state)
            .records
            .push(InputRecord::Key(KeyEvent { code, pressed }));
    }

    fn sync(&mut self) {
        lock(&self.state).records.push(InputRecord::Sync);
    }
}

impl InputRegistry for MockInputRegistry {
    type Sink = MockSink;
    type Error = MockRegistryError;

    fn register(&mut self, info: &InputDeviceInfo) -> Result<MockSink, Self::Error> {
        let mut state = lock(&self.state);
        if state.fail_register {
            return Err(MockRegistryError::Rejected);
        }
        if state.registered.is_some() {
            return Err(MockRegistryError::Busy);
        }
        state.registered = Some(info.clone());
        self.journal.record(Op::InputRegistered);
        Ok(MockSink {
            state: Arc::clone(&self.state),
        })
    }

    fn unregister(&mut self, sink: MockSink) {
        drop(sink);
        lock(&self.state).registered = None;
        self.journal.record(Op::InputUnregistered);
    }
}

// ── Wake control ─────────────────────────────────────────────────────────────

/// Errors raised by [`MockWake`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockWakeError {
    /// Interrupt cannot wake the host (injected)
    Unsupported,
    /// Interrupt was not armed
    NotArmed,
}

#[derive(Default)]
struct WakeState {
    wakeup_capable: bool,
    armed: Vec<IrqNumber>,
    fail_enable: bool,
}

/// Mock wake-source controller.
#[derive(Clone, Default)]
pub struct MockWake {
    state: Arc<Mutex<WakeState>>,
    journal: Journal,
}

impl MockWake {
    /// Create a controller with nothing armed
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Arc::default(),
            journal,
        }
    }

    /// Make arming fail (or succeed again)
    pub fn fail_enable(&self, fail: bool) {
        lock(&self.state).fail_enable = fail;
    }

    /// Whether the device is marked wake-capable
    pub fn is_wakeup_capable(&self) -> bool {
        lock(&self.state).wakeup_capable
    }

    /// Whether `irq` is armed
    pub fn is_armed(&self, irq: IrqNumber) -> bool {
        lock(&self.state).armed.contains(&irq)
    }

    /// Number of armed interrupts
    pub fn armed_count(&self) -> usize {
        lock(&self.state).armed.len()
    }
}

impl WakeControl for MockWake {
    type Error = MockWakeError;

    fn set_wakeup_capable(&mut self, enable: bool) {
        lock(&self.state).wakeup_capable = enable;
        self.journal.record(Op::WakeupCapable(enable));
    }

    fn enable_irq_wake(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if state.fail_enable {
            return Err(MockWakeError::Unsupported);
        }
        if !state.armed.contains(&irq) {
            state.armed.push(irq);
        }
        self.journal.record(Op::IrqWakeEnabled(irq));
        Ok(())
    }

    fn disable_irq_wake(&mut self, irq: IrqNumber) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if !state.armed.contains(&irq) {
            return Err(MockWakeError::NotArmed);
        }
        state.armed.retain(|a| *a != irq);
        self.journal.record(Op::IrqWakeDisabled(irq));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_mock_line_reads_level() {
        let mut line = MockLine::new(false);
        assert!(!line.is_high().unwrap());
        line.set_level(true);
        assert!(line.is_high().unwrap());
        assert!(!line.is_low().unwrap());
        assert_eq!(line.read_count(), 3);
    }

    #[test]
    fn test_mock_line_injected_read_failure() {
        let mut line = MockLine::new(true);
        line.fail_reads(true);
        assert_eq!(line.is_high(), Err(MockLineError::ReadFailed));
        assert_eq!(line.read_count(), 0);
    }

    #[test]
    fn test_mock_line_drops_edges_without_registration() {
        let mut line = MockLine::new(false);
        assert!(!line.queue_edge(true));

        line.enable_interrupt(InterruptMode::BothEdges).unwrap();
        assert!(line.queue_edge(true));

        line.disable_interrupt().unwrap();
        assert!(line.shared.edges.try_receive().is_err());
    }

    #[tokio::test]
    async fn test_mock_line_edge_applies_level() {
        let mut line = MockLine::new(false);
        line.enable_interrupt(InterruptMode::BothEdges).unwrap();
        assert!(line.queue_edge(true));

        line.wait_for_any_edge().await.unwrap();
        assert!(line.level());
    }

    #[tokio::test]
    async fn test_mock_line_waits_for_rising_edge() {
        let mut line = MockLine::new(true);
        line.enable_interrupt(InterruptMode::BothEdges).unwrap();
        assert!(line.queue_edge(false));
        assert!(line.queue_edge(true));

        line.wait_for_rising_edge().await.unwrap();
        assert!(line.level());
    }

    #[test]
    fn test_mock_provider_hands_out_line_once() {
        let journal = Journal::new();
        let mut provider = MockLineProvider::new(journal.clone());
        let id = LineId::new(7);
        provider.add_line(id, MockLine::new(false));

        let line = provider.request(id, "test").unwrap();
        assert_eq!(provider.request(id, "test").err(), Some(MockProviderError::Busy(id)));
        assert_eq!(provider.to_irq(&line).unwrap(), IrqNumber::new(107));

        provider.free(line);
        assert!(!provider.is_outstanding(id));
        assert_eq!(
            journal.ops(),
            [
                Op::LineRequested(id),
                Op::IrqResolved(IrqNumber::new(107)),
                Op::LineFreed(id)
            ]
        );
    }

    #[test]
    fn test_mock_provider_unknown_line() {
        let mut provider = MockLineProvider::new(Journal::new());
        let id = LineId::new(3);
        assert_eq!(provider.request(id, "test").err(), Some(MockProviderError::NoSuchLine(id)));
    }

    #[test]
    fn test_mock_registry_records_sink_output() {
        let mut registry = MockInputRegistry::new(Journal::new());
        let info = InputDeviceInfo::new("mock", "/dev/input/mock", crate::input::BusType::Virtual);
        let mut sink = registry.register(&info).unwrap();

        sink.report_key(KeyCode(1), true);
        sink.sync();
        assert_eq!(registry.key_events(), [KeyEvent::press(KeyCode(1))]);
        assert_eq!(registry.records().len(), 2);

        assert_eq!(registry.register(&info).err(), Some(MockRegistryError::Busy));
        registry.unregister(sink);
        assert!(!registry.is_registered());
    }

    #[test]
    fn test_mock_wake_arm_and_disarm() {
        let mut wake = MockWake::new(Journal::new());
        let irq = IrqNumber::new(9);

        assert_eq!(wake.disable_irq_wake(irq), Err(MockWakeError::NotArmed));
        wake.enable_irq_wake(irq).unwrap();
        assert!(wake.is_armed(irq));
        wake.disable_irq_wake(irq).unwrap();
        assert_eq!(wake.armed_count(), 0);

        wake.fail_enable(true);
        assert_eq!(wake.enable_irq_wake(irq), Err(MockWakeError::Unsupported));
    }
}
