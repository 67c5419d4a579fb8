//! Switch configuration resolved from the device description.
//!
//! # Binding
//!
//! | Property              | Type          | Required | Meaning                          |
//! |-----------------------|---------------|----------|----------------------------------|
//! | `slide-button,gpios`  | gpio, index 0 | yes      | switch line                      |
//! | `slide-button,wakeup` | flag          | no       | line may wake the host           |
//! | `debounce-interval`   | u32 (ms)      | no       | debounce hint, default 15 ms     |
//!
//! The debounce hint is carried on the bound switch but no code path delays
//! or filters edges with it; re-reading the level on every edge is the only
//! bounce suppression.

use platform::devicetree::DeviceNode;
use platform::gpio::LineId;

use crate::error::ConfigError;

/// Line property name.
pub const PROP_GPIOS: &str = "slide-button,gpios";

/// Wake flag property name.
pub const PROP_WAKEUP: &str = "slide-button,wakeup";

/// Debounce hint property name.
pub const PROP_DEBOUNCE_INTERVAL: &str = "debounce-interval";

/// Debounce hint used when the description has none.
pub const DEFAULT_DEBOUNCE_INTERVAL_MS: u32 = 15;

/// Resolved switch configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchConfig {
    /// Switch line
    pub line: LineId,
    /// Whether the line may wake the host
    pub wakeup: bool,
    /// Advisory debounce interval in milliseconds
    pub debounce_interval_ms: u32,
}

impl SwitchConfig {
    /// Read the configuration from `node`.
    ///
    /// A missing or invalid line is fatal. A missing debounce hint is not:
    /// it is logged and replaced by [`DEFAULT_DEBOUNCE_INTERVAL_MS`].
    pub fn from_node<N: DeviceNode + ?Sized>(node: &N) -> Result<Self, ConfigError> {
        let wakeup = node.read_bool(PROP_WAKEUP);

        let raw = node.named_gpio(PROP_GPIOS, 0).ok_or(ConfigError::MissingLine)?;
        let line = LineId::from_raw(raw).ok_or(ConfigError::InvalidLine(raw))?;

        let debounce_interval_ms = node.read_u32(PROP_DEBOUNCE_INTERVAL).unwrap_or_else(|| {
            error!(
                "failed to read debounce-interval, set to {}",
                DEFAULT_DEBOUNCE_INTERVAL_MS
            );
            DEFAULT_DEBOUNCE_INTERVAL_MS
        });

        Ok(Self {
            line,
            wakeup,
            debounce_interval_ms,
        })
    }
}
