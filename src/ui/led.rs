//! Status LED driver.
//!
//! The USB handler publishes [`UsbStatus`] changes through a signal; this
//! task renders the current status on an active-low LED.

use defmt::debug;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use serial_remote::config::LED_TICK_MS;
use serial_remote::status::UsbStatus;

static STATUS_SIGNAL: Signal<CriticalSectionRawMutex, UsbStatus> = Signal::new();

/// Publish a new USB status for the LED.
pub fn set_status(status: UsbStatus) {
    STATUS_SIGNAL.signal(status);
}

pub async fn led_task(pin: AnyPin) -> ! {
    // Active-low: start dark.
    let mut led = Output::new(pin, Level::High, OutputDrive::Standard);
    let mut status = UsbStatus::default();
    let mut ticker = Ticker::every(Duration::from_millis(LED_TICK_MS));
    let mut tick: u32 = 0;

    loop {
        if let Some(next) = STATUS_SIGNAL.try_take() {
            if next != status {
                debug!("LED status: {} -> {}", status, next);
                status = next;
                tick = 0;
            }
        }

        if status.led_on(tick) {
            led.set_low();
        } else {
            led.set_high();
        }

        tick = tick.wrapping_add(1);
        ticker.next().await;
    }
}
