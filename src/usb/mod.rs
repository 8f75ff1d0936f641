//! USB Device subsystem - presents a single HID interface to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. One interrupt IN endpoint carries three reports,
//! distinguished by report ID:
//!
//! - 1: Keyboard
//! - 2: Media Control
//! - 3: System Control
//!
//! The poll task runs the translator every HID interval and writes its
//! output; the device task handles suspend/resume and remote wakeup.

pub mod hid_device;
