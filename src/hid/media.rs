//! Media Control HID report (report ID 2, Consumer usage page 0x0C).
//!
//! Eleven independent one-bit controls packed into a 16-bit little-endian
//! bitfield; the top five bits are padding.
//!
//! ```text
//! Bit  0 Play           Bit  6 Stop
//! Bit  1 Pause          Bit  7 Play/Pause
//! Bit  2 Fast Forward   Bit  8 Mute
//! Bit  3 Rewind         Bit  9 Volume Up
//! Bit  4 Next Track     Bit 10 Volume Down
//! Bit  5 Previous Track
//! ```

/// Media control report size (2 bytes).
pub const MEDIA_REPORT_SIZE: usize = 2;

/// Mask of the bits backed by a control; the rest is descriptor padding.
const CONTROL_MASK: u16 = 0x07FF;

/// One media control flag. The discriminant is the bit position in the
/// report, which is also the order of the usages in the descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MediaControl {
    Play = 0,
    Pause = 1,
    FastForward = 2,
    Rewind = 3,
    NextTrack = 4,
    PreviousTrack = 5,
    Stop = 6,
    PlayPause = 7,
    Mute = 8,
    VolumeUp = 9,
    VolumeDown = 10,
}

impl MediaControl {
    /// All controls in bit order.
    pub const ALL: [MediaControl; 11] = [
        MediaControl::Play,
        MediaControl::Pause,
        MediaControl::FastForward,
        MediaControl::Rewind,
        MediaControl::NextTrack,
        MediaControl::PreviousTrack,
        MediaControl::Stop,
        MediaControl::PlayPause,
        MediaControl::Mute,
        MediaControl::VolumeUp,
        MediaControl::VolumeDown,
    ];

    /// Consumer page usage ID for this control.
    pub const fn usage(self) -> u8 {
        match self {
            MediaControl::Play => 0xB0,
            MediaControl::Pause => 0xB1,
            MediaControl::FastForward => 0xB3,
            MediaControl::Rewind => 0xB4,
            MediaControl::NextTrack => 0xB5,
            MediaControl::PreviousTrack => 0xB6,
            MediaControl::Stop => 0xB7,
            MediaControl::PlayPause => 0xCD,
            MediaControl::Mute => 0xE2,
            MediaControl::VolumeUp => 0xE9,
            MediaControl::VolumeDown => 0xEA,
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

/// Media Control HID report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaControlReport {
    flags: u16,
}

impl MediaControlReport {
    /// Create an empty (no controls pressed) report.
    pub const fn empty() -> Self {
        Self { flags: 0 }
    }

    /// Create a report with exactly one control pressed.
    pub const fn new(control: MediaControl) -> Self {
        Self {
            flags: control.bit(),
        }
    }

    /// Whether `control` is pressed in this report.
    pub fn is_set(&self, control: MediaControl) -> bool {
        self.flags & control.bit() != 0
    }

    /// Number of pressed controls.
    pub fn pressed_count(&self) -> u32 {
        (self.flags & CONTROL_MASK).count_ones()
    }

    /// Check if any control is pressed.
    pub fn is_empty(&self) -> bool {
        self.flags & CONTROL_MASK == 0
    }

    /// Serialize to USB HID report bytes.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MEDIA_REPORT_SIZE {
            return 0;
        }
        let bytes = (self.flags & CONTROL_MASK).to_le_bytes();
        buf[0] = bytes[0];
        buf[1] = bytes[1];
        MEDIA_REPORT_SIZE
    }
}
