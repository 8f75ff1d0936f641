//! Error type for the embedded collaborators.
//!
//! The translation core is infallible; only the USB, UART and wakeup
//! plumbing around it can fail. We avoid `alloc` - all error variants
//! carry only fixed-size data. Errors are logged and the poll loop keeps
//! running.

use defmt::Format;
use embassy_usb::driver::EndpointError;
use embassy_usb::RemoteWakeupError;

#[derive(Debug, Clone, Copy, Format)]
pub enum Error {
    // USB
    /// HID endpoint write failed.
    Usb(UsbError),

    // Serial
    /// UARTE receive failed (framing, overrun, ...).
    UartRx,

    /// Byte queue to the poll loop was full; the byte was dropped.
    UartOverflow,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

#[derive(Debug, Clone, Copy, Format)]
pub enum UsbError {
    /// Endpoint disabled - host has not configured us or the bus is down.
    Disabled,
    /// Report larger than the endpoint buffer.
    BufferOverflow,
    /// Host refused or was not able to accept a remote wakeup.
    WakeupRejected,
}

// Convenience conversions

impl From<UsbError> for Error {
    fn from(e: UsbError) -> Self {
        Error::Usb(e)
    }
}

impl From<EndpointError> for Error {
    fn from(e: EndpointError) -> Self {
        match e {
            EndpointError::Disabled => Error::Usb(UsbError::Disabled),
            EndpointError::BufferOverflow => Error::Usb(UsbError::BufferOverflow),
        }
    }
}

impl From<RemoteWakeupError> for Error {
    fn from(_: RemoteWakeupError) -> Self {
        Error::Usb(UsbError::WakeupRejected)
    }
}

impl From<embassy_nrf::uarte::Error> for Error {
    fn from(_: embassy_nrf::uarte::Error) -> Self {
        Error::UartRx
    }
}
