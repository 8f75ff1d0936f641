//! USB status indication for the single status LED.
//!
//! Tracks the coarse USB lifecycle from device events and decides, per
//! LED tick, whether the LED is lit:
//!
//! | Status      | LED          |
//! |-------------|--------------|
//! | NotReady    | off          |
//! | Enumerating | slow blink   |
//! | Ready       | on           |
//! | Error       | fast blink   |

use crate::config::{LED_FAST_BLINK_TICKS, LED_SLOW_BLINK_TICKS};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbStatus {
    /// Not attached to a host.
    #[default]
    NotReady,
    /// Attached, waiting for the host to configure us.
    Enumerating,
    /// Configured; reports are flowing.
    Ready,
    /// Configuration failed.
    Error,
}

impl UsbStatus {
    pub fn on_disconnect(self) -> Self {
        UsbStatus::NotReady
    }

    pub fn on_connect(self) -> Self {
        UsbStatus::Enumerating
    }

    /// Host finished (or abandoned) SET_CONFIGURATION.
    pub fn on_configuration_changed(self, success: bool) -> Self {
        if success {
            UsbStatus::Ready
        } else {
            UsbStatus::Error
        }
    }

    /// Whether the LED is lit at LED tick `tick`.
    pub fn led_on(self, tick: u32) -> bool {
        match self {
            UsbStatus::NotReady => false,
            UsbStatus::Ready => true,
            UsbStatus::Enumerating => blink(tick, LED_SLOW_BLINK_TICKS),
            UsbStatus::Error => blink(tick, LED_FAST_BLINK_TICKS),
        }
    }
}

fn blink(tick: u32, half_period: u32) -> bool {
    (tick / half_period) % 2 == 0
}
