//! Two-position slide switch driver.
//!
//! Watches one digital input line and turns every change of its position into
//! a discrete key event: a press immediately followed by a release of
//! [`KEY_SLIDE_ON`] or [`KEY_SLIDE_OFF`], each closed by a sync.
//!
//! # Architecture
//!
//! ```text
//! registrar ──probe/remove──▶ SlideSwitchDriver
//!                                   │
//!                                   ▼
//!                             SlideSwitch (lifecycle)
//!                     ┌─────────────┼──────────────┐
//!                     ▼             ▼              ▼
//!               LineMonitor   TransitionReporter   InputSink
//!               (level, edges)  (Off ⇄ On)         (key pairs)
//! ```
//!
//! Edges are consumed by an async task ([`SlideSwitch::run`]) rather than in
//! interrupt context, so the level read may block. Every edge re-reads the
//! level and only a change relative to the last committed position is
//! reported; this is the only bounce suppression. The configured debounce
//! interval is kept on the switch but never applied.
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`SwitchError`], platform mocks
//! - `defmt`: log through defmt (hardware builds)
//! - `tracing`: log through tracing (desktop and simulator builds)
//!
//! # Example
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use embassy_sync::signal::Signal;
//! use platform::{DeviceNode, InputRegistry, LineProvider, WakeControl};
//! use slide_switch::SlideSwitchDriver;
//!
//! async fn bind<P, R, W>(node: &dyn DeviceNode, lines: P, inputs: R, power: W)
//! where
//!     P: LineProvider,
//!     R: InputRegistry,
//!     W: WakeControl,
//! {
//!     let mut driver = SlideSwitchDriver::new(lines, inputs, power);
//!     if driver.probe(node).is_err() {
//!         return;
//!     }
//!     let stop = Signal::<NoopRawMutex, ()>::new();
//!     if let Some(switch) = driver.switch_mut() {
//!         switch.run(&stop).await;
//!     }
//!     driver.remove();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod config;
pub mod driver;
pub mod error;
pub mod keymap;
pub mod lifecycle;
pub mod monitor;
pub mod reporter;

pub use config::{SwitchConfig, DEFAULT_DEBOUNCE_INTERVAL_MS};
pub use driver::{BoundSwitch, SlideSwitchDriver};
pub use error::{ConfigError, Resource, SwitchError};
pub use keymap::{SwitchState, KEY_SLIDE_OFF, KEY_SLIDE_ON};
pub use lifecycle::SlideSwitch;
pub use monitor::LineMonitor;
pub use reporter::{EdgeOutcome, TransitionReporter};
