//! serial-remote: serial/button input to momentary USB HID events.
//!
//! This crate holds the hardware-independent core: input aggregation,
//! the report translator state machine, HID report encoding, and the
//! status LED policy. It is `no_std` and runs unchanged on the host for
//! testing.
//!
//! Usage: `cargo test` (host) or `cargo run --release --features embedded`
//! (nRF52840 via probe-rs).
//!
//! Note: The embedded binary lives in main.rs with #![no_std] and
//! #![no_main]; it only provides the USB, UART, button and LED
//! collaborators and drives [`translator::ReportTranslator::tick`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod hid;
pub mod input;
pub mod status;
pub mod translator;

pub use hid::{Report, ReportKind};
pub use input::{ButtonSource, InputAggregator, InputSymbol, SerialSource};
pub use translator::{
    CreatedReport, RemoteWakeup, ReportTranslator, SessionState, TickOutcome, TranslatorState,
};
