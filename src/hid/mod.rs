//! HID report types, report IDs and wire encoding.
//!
//! Every report the device sends is one of three mutually exclusive
//! kinds. The translator works with the typed [`Report`]; serialization
//! into the fixed-size endpoint buffer happens at the USB boundary.

pub mod descriptor;
pub mod filter;
pub mod keyboard;
pub mod media;
pub mod system_control;


pub use descriptor::REPORT_DESCRIPTOR;
pub use filter::SentReportFilter;
pub use keyboard::KeyboardReport;
pub use media::{MediaControl, MediaControlReport};
pub use system_control::SystemControlReport;

use keyboard::KEYBOARD_REPORT_SIZE;
use media::MEDIA_REPORT_SIZE;
use system_control::SYSTEM_CONTROL_REPORT_SIZE;

pub const KEYBOARD_REPORT_ID: u8 = 1;
pub const MEDIA_CONTROL_REPORT_ID: u8 = 2;
pub const SYSTEM_CONTROL_REPORT_ID: u8 = 3;

/// Largest report on the wire: report-ID byte plus the keyboard payload.
pub const MAX_REPORT_SIZE: usize = 1 + KEYBOARD_REPORT_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportKind {
    SystemControl,
    Keyboard,
    MediaControl,
}

impl ReportKind {
    pub const fn report_id(self) -> u8 {
        match self {
            ReportKind::Keyboard => KEYBOARD_REPORT_ID,
            ReportKind::MediaControl => MEDIA_CONTROL_REPORT_ID,
            ReportKind::SystemControl => SYSTEM_CONTROL_REPORT_ID,
        }
    }

    pub fn from_report_id(report_id: u8) -> Option<Self> {
        match report_id {
            KEYBOARD_REPORT_ID => Some(ReportKind::Keyboard),
            MEDIA_CONTROL_REPORT_ID => Some(ReportKind::MediaControl),
            SYSTEM_CONTROL_REPORT_ID => Some(ReportKind::SystemControl),
            _ => None,
        }
    }

    /// Payload size in bytes, excluding the report-ID byte.
    pub const fn payload_size(self) -> usize {
        match self {
            ReportKind::Keyboard => KEYBOARD_REPORT_SIZE,
            ReportKind::MediaControl => MEDIA_REPORT_SIZE,
            ReportKind::SystemControl => SYSTEM_CONTROL_REPORT_SIZE,
        }
    }
}

/// A populated HID input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    SystemControl(SystemControlReport),
    Keyboard(KeyboardReport),
    MediaControl(MediaControlReport),
}

impl Report {
    /// The all-zero ("released") report of `kind`.
    pub const fn released(kind: ReportKind) -> Self {
        match kind {
            ReportKind::SystemControl => Report::SystemControl(SystemControlReport::empty()),
            ReportKind::Keyboard => Report::Keyboard(KeyboardReport::empty()),
            ReportKind::MediaControl => Report::MediaControl(MediaControlReport::empty()),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Report::SystemControl(_) => ReportKind::SystemControl,
            Report::Keyboard(_) => ReportKind::Keyboard,
            Report::MediaControl(_) => ReportKind::MediaControl,
        }
    }

    pub fn report_id(&self) -> u8 {
        self.kind().report_id()
    }

    /// Number of controls/keys pressed in this report.
    pub fn pressed_count(&self) -> usize {
        match self {
            Report::SystemControl(s) => s.pressed_count(),
            Report::Keyboard(k) => k.pressed_count(),
            Report::MediaControl(m) => m.pressed_count() as usize,
        }
    }

    /// Returns `true` when nothing is pressed.
    pub fn is_released(&self) -> bool {
        match self {
            Report::SystemControl(s) => s.is_empty(),
            Report::Keyboard(k) => k.is_empty(),
            Report::MediaControl(m) => m.is_empty(),
        }
    }

    /// Serialize the payload (without report ID). Returns 0 if `buf` is
    /// too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            Report::SystemControl(s) => s.serialize(buf),
            Report::Keyboard(k) => k.serialize(buf),
            Report::MediaControl(m) => m.serialize(buf),
        }
    }
}

/// Encode `report` as it travels on the interrupt endpoint: report-ID
/// byte followed by the payload. Returns 0 if `buf` is too small.
pub fn encode_with_id(report: &Report, buf: &mut [u8]) -> usize {
    if buf.len() < 1 + report.kind().payload_size() {
        return 0;
    }
    buf[0] = report.report_id();
    1 + report.serialize(&mut buf[1..])
}
