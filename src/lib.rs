//! Hardware independent part of the PineTime weather watchface.
//!
//! Everything in here runs on the host as well as on the watch: the display
//! state controller, text formatting, rendering onto any
//! `embedded_graphics::DrawTarget`, the companion message format, clock
//! keeping and battery estimation. The firmware in `main.rs` only wires the
//! nRF52 peripherals to these pieces.

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod battery;
pub mod clock;
pub mod config;
pub mod controller;
pub mod event;
pub mod haptics;
pub mod messaging;
pub mod text;
pub mod ui;

pub use config::WatchfaceConfig;
pub use controller::{Snapshot, WatchfaceController};
pub use event::Event;
pub use ui::{DisplayState, Region, Regions};
