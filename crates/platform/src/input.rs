//! Input event sink abstraction
//!
//! Drivers register a symbolic input device with an [`InputRegistry`] and get
//! back an [`InputSink`] that accepts key reports separated by explicit sync
//! boundaries. [`ChannelRegistry`] is the `no_std` implementation: records go
//! into an Embassy [`Channel`] drained by whatever multiplexes input events.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};

/// Maximum number of key codes one input device may enable.
pub const MAX_KEYS: usize = 8;

/// Symbolic key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct KeyCode(pub u16);

/// One key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    /// Key that changed
    pub code: KeyCode,
    /// `true` for press, `false` for release
    pub pressed: bool,
}

impl KeyEvent {
    /// Press of `code`.
    #[must_use]
    pub const fn press(code: KeyCode) -> Self {
        Self {
            code,
            pressed: true,
        }
    }

    /// Release of `code`.
    #[must_use]
    pub const fn release(code: KeyCode) -> Self {
        Self {
            code,
            pressed: false,
        }
    }
}

/// Primitive record as seen by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputRecord {
    /// Key report
    Key(KeyEvent),
    /// End of one logical state
    Sync,
}

/// Bus an input device sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusType {
    /// Wired directly to the host (GPIO, on-chip)
    Host,
    /// Software-only device
    Virtual,
}

/// Errors from building an [`InputDeviceInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyTableFull {
    /// More than [`MAX_KEYS`] codes were enabled; carries the rejected code.
    Rejected(KeyCode),
}

/// Identity and capabilities of a registered input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeviceInfo {
    /// Device name
    pub name: &'static str,
    /// Physical path shown to consumers
    pub phys: &'static str,
    /// Bus type
    pub bus: BusType,
    keys: heapless::Vec<KeyCode, MAX_KEYS>,
}

impl InputDeviceInfo {
    /// Describe a device with no keys enabled yet.
    #[must_use]
    pub const fn new(name: &'static str, phys: &'static str, bus: BusType) -> Self {
        Self {
            name,
            phys,
            bus,
            keys: heapless::Vec::new(),
        }
    }

    /// Enable reporting of `code`. Enabling a code twice is a no-op.
    pub fn enable_key(&mut self, code: KeyCode) -> Result<(), KeyTableFull> {
        if self.keys.contains(&code) {
            return Ok(());
        }
        self.keys.push(code).map_err(KeyTableFull::Rejected)
    }

    /// Enabled key codes, in the order they were enabled.
    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    /// Whether `code` was enabled.
    pub fn has_key(&self, code: KeyCode) -> bool {
        self.keys.contains(&code)
    }
}

/// Write side of a registered input device.
pub trait InputSink {
    /// Report a key press (`pressed = true`) or release.
    fn report_key(&mut self, code: KeyCode, pressed: bool);

    /// Close the current logical state.
    fn sync(&mut self);

    /// Report one discrete press/release pair of `code`.
    ///
    /// Emits press, sync, release, sync. Sinks that can lose records must
    /// deliver either all four or none of them, so a consumer never sees a
    /// press without its release.
    fn report_tap(&mut self, code: KeyCode) {
        self.report_key(code, true);
        self.sync();
        self.report_key(code, false);
        self.sync();
    }
}

/// Accepts input device registrations.
pub trait InputRegistry {
    /// Sink handed to the registered driver
    type Sink: InputSink;

    /// Error type
    type Error: core::fmt::Debug;

    /// Register a device exposing exactly the keys in `info`.
    fn register(&mut self, info: &InputDeviceInfo) -> Result<Self::Sink, Self::Error>;

    /// Remove a previously registered device.
    fn unregister(&mut self, sink: Self::Sink);
}

// ── Channel-backed implementation ────────────────────────────────────────────

/// Registration errors for [`ChannelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A device is already registered on this channel
    Busy,
    /// The device enables no keys
    NoKeys,
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Busy => write!(f, "Input channel already has a registered device"),
            Self::NoKeys => write!(f, "Input device enables no keys"),
        }
    }
}

/// Registry that feeds one device into a static [`Channel`].
pub struct ChannelRegistry<'ch, M: RawMutex, const N: usize> {
    channel: &'ch Channel<M, InputRecord, N>,
    claimed: bool,
}

impl<'ch, M: RawMutex, const N: usize> ChannelRegistry<'ch, M, N> {
    /// Create a registry writing into `channel`.
    pub const fn new(channel: &'ch Channel<M, InputRecord, N>) -> Self {
        Self {
            channel,
            claimed: false,
        }
    }

    /// Whether a device is currently registered.
    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

impl<'ch, M: RawMutex, const N: usize> InputRegistry for ChannelRegistry<'ch, M, N> {
    type Sink = ChannelSink<'ch, M, N>;
    type Error = RegistryError;

    fn register(&mut self, info: &InputDeviceInfo) -> Result<Self::Sink, Self::Error> {
        if self.claimed {
            return Err(RegistryError::Busy);
        }
        if info.keys().is_empty() {
            return Err(RegistryError::NoKeys);
        }
        self.claimed = true;
        Ok(ChannelSink {
            tx: self.channel.sender(),
            keys: info.keys.clone(),
            frame_open: false,
            dropped: 0,
        })
    }

    fn unregister(&mut self, sink: Self::Sink) {
        drop(sink);
        self.claimed = false;
    }
}

/// Sink writing [`InputRecord`]s into a [`Channel`].
///
/// Sends never block. If the consumer stalls and the channel fills up, records
/// are dropped and counted rather than stalling the reporting task; a tap is
/// dropped whole. Reports for codes the device did not enable are ignored, and
/// a sync that would close an empty frame is not sent.
pub struct ChannelSink<'ch, M: RawMutex, const N: usize> {
    tx: Sender<'ch, M, InputRecord, N>,
    keys: heapless::Vec<KeyCode, MAX_KEYS>,
    frame_open: bool,
    dropped: u32,
}

/// Records in one tap: press, sync, release, sync.
const TAP_RECORDS: usize = 4;

impl<M: RawMutex, const N: usize> ChannelSink<'_, M, N> {
    /// Number of records dropped because the channel was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn push(&mut self, record: InputRecord) -> bool {
        if self.tx.try_send(record).is_ok() {
            true
        } else {
            self.dropped = self.dropped.saturating_add(1);
            false
        }
    }
}

impl<M: RawMutex, const N: usize> InputSink for ChannelSink<'_, M, N> {
    fn report_key(&mut self, code: KeyCode, pressed: bool) {
        if !self.keys.contains(&code) {
            return;
        }
        if self.push(InputRecord::Key(KeyEvent { code, pressed })) {
            self.frame_open = true;
        }
    }

    fn sync(&mut self) {
        if self.frame_open {
            self.push(InputRecord::Sync);
            self.frame_open = false;
        }
    }

    fn report_tap(&mut self, code: KeyCode) {
        if !self.keys.contains(&code) {
            return;
        }
        // The registry hands out one sink per channel, so nothing else can
        // fill the channel between this check and the sends below.
        if self.tx.free_capacity() < TAP_RECORDS {
            let lost = u32::try_from(TAP_RECORDS).unwrap_or(u32::MAX);
            self.dropped = self.dropped.saturating_add(lost);
            return;
        }
        self.report_key(code, true);
        self.sync();
        self.report_key(code, false);
        self.sync();
    }
}
