//! Hardware Abstraction Layer (HAL) for slide-switch input drivers
//!
//! This crate provides trait-based abstractions for every collaborator an
//! input-line driver talks to, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Device registrar (board support / bus code)
//!         ↓
//! Driver crate (slide-switch)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL / OS GPIO character device)
//! ```
//!
//! # Collaborators
//!
//! - [`gpio`] - input lines, edge delivery, line ownership
//! - [`input`] - input device registration and the key-event sink
//! - [`power`] - wake-source control
//! - [`devicetree`] - read-only device description access
//!
//! # Features
//!
//! - `std`: Enable standard library support and the [`mocks`] module
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{InputSink, KeyCode};
//!
//! fn tap<S: InputSink>(sink: &mut S, code: KeyCode) {
//!     sink.report_key(code, true);
//!     sink.sync();
//!     sink.report_key(code, false);
//!     sink.sync();
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
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod devicetree;
pub mod gpio;
pub mod input;
pub mod mocks;
pub mod power;

// Re-export collaborator traits
pub use devicetree::{DeviceNode, StaticNode};
pub use gpio::{InterruptLine, InterruptMode, IrqNumber, LineId, LineProvider};
pub use input::{
    BusType, ChannelRegistry, ChannelSink, InputDeviceInfo, InputRecord, InputRegistry,
    InputSink, KeyCode, KeyEvent,
};
pub use power::{WakeControl, WakeSource};
