//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters, and protocol constants live
//! here so they can be tuned in one place. The device has no runtime
//! configuration and no persisted state.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "serial-remote";
pub const USB_PRODUCT: &str = "Serial Remote";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Bus current drawn once configured (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// USB HID polling interval (ms). Every poll tick runs the translator once.
pub const USB_HID_POLL_MS: u8 = 1;

/// Interrupt IN endpoint size. Large enough for the biggest report plus
/// its report-ID byte.
pub const USB_HID_EPSIZE: u16 = 16;

// Serial

/// UART baud rate. The nRF52840 UARTE cannot go below 1200 baud.
pub const UART_BAUD_RATE: u32 = 1200;

/// Depth of the byte queue between the UART receive task and the poll loop.
pub const SERIAL_QUEUE_DEPTH: usize = 16;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button (sleep / wake) → P0.11
//   UART RX               → P0.08
//   Status LED            → P0.13

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

// Status LED

/// LED task refresh period (ms). Blink periods are counted in these ticks.
pub const LED_TICK_MS: u64 = 50;

/// Half-period of the "enumerating" blink, in LED ticks (500 ms).
pub const LED_SLOW_BLINK_TICKS: u32 = 10;

/// Half-period of the "error" blink, in LED ticks (100 ms).
pub const LED_FAST_BLINK_TICKS: u32 = 2;
