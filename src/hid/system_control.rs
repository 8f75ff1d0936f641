//! System Control HID report (report ID 3, Generic Desktop 0x80).
//!
//! Layout (1 byte):
//! ```text
//! Bit 0 = System Power Down
//! Bit 1 = System Sleep
//! Bit 2 = System Wake Up
//! Bit 3-7 = padding
//! ```

/// System control report size in bytes.
pub const SYSTEM_CONTROL_REPORT_SIZE: usize = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemControlReport {
    pub power_down: bool,
    pub sleep: bool,
    pub wake_up: bool,
}

impl SystemControlReport {
    pub const fn empty() -> Self {
        Self {
            power_down: false,
            sleep: false,
            wake_up: false,
        }
    }

    /// Report asking the host to go to sleep.
    pub const fn sleep() -> Self {
        Self {
            power_down: false,
            sleep: true,
            wake_up: false,
        }
    }

    pub fn pressed_count(&self) -> usize {
        [self.power_down, self.sleep, self.wake_up]
            .iter()
            .filter(|&&b| b)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed_count() == 0
    }

    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SYSTEM_CONTROL_REPORT_SIZE {
            return 0;
        }
        buf[0] = (self.power_down as u8) | (self.sleep as u8) << 1 | (self.wake_up as u8) << 2;
        SYSTEM_CONTROL_REPORT_SIZE
    }
}
