//! GPIO button input with async debouncing.
//!
//! The button is active-low with the internal pull-up enabled. A task
//! waits for edges, debounces them, and publishes the stable level in an
//! atomic that the poll loop samples through [`DebouncedButton`].

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};
use serial_remote::config::BUTTON_DEBOUNCE_MS;
use serial_remote::ButtonSource;

static BUTTON_HELD: AtomicBool = AtomicBool::new(false);

/// Poll-loop view of the debounced button level.
pub struct DebouncedButton;

impl ButtonSource for DebouncedButton {
    fn is_pressed(&self) -> bool {
        BUTTON_HELD.load(Ordering::Relaxed)
    }
}

/// Run the button debouncing loop.
///
/// Waits for the pin to go low (pressed), debounces, publishes "held",
/// then waits for release and debounces that too before publishing
/// "released".
pub async fn button_task(pin: AnyPin) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        // Wait for falling edge (button press, active-low).
        btn.wait_for_falling_edge().await;

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if btn.is_low() {
            info!("Button pressed");
            BUTTON_HELD.store(true, Ordering::Relaxed);

            btn.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

            info!("Button released");
            BUTTON_HELD.store(false, Ordering::Relaxed);
        }
    }
}
