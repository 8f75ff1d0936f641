//! serial-remote firmware entry point (nRF52840).
//!
//! Wires the hardware collaborators to the translation core:
//!
//! - UARTE0 RX → byte channel → [`uart::UartSerial`]
//! - Button GPIO → debounce task → [`ui::buttons::DebouncedButton`]
//! - USB device task (enumeration, suspend/resume, remote wakeup)
//! - HID poll task (runs the translator every poll interval)
//! - Status LED task

#![no_std]
#![no_main]

mod error;
mod uart;
mod ui;
mod usb;

use core::cell::RefCell;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::uarte::UarteRx;
use embassy_nrf::{bind_interrupts, peripherals, uarte};
use embassy_sync::blocking_mutex::Mutex;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;
use serial_remote::{InputAggregator, ReportTranslator};
use static_cell::StaticCell;
use uart::{ByteChannel, ByteSender, UartSerial};
use ui::buttons::DebouncedButton;
use usb::hid_device::{SharedTranslator, UsbDriver, HID_WRITER_SIZE};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct UartIrqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

static SERIAL_BYTES: ByteChannel = ByteChannel::new();
static TRANSLATOR: StaticCell<SharedTranslator> = StaticCell::new();

#[embassy_executor::task]
async fn usb_device_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    usb::hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_poll_task(
    writer: HidWriter<'static, UsbDriver, HID_WRITER_SIZE>,
    translator: &'static SharedTranslator,
) -> ! {
    usb::hid_device::hid_poll_task(writer, translator).await
}

#[embassy_executor::task]
async fn uart_task(rx: UarteRx<'static, peripherals::UARTE0>, tx: ByteSender) -> ! {
    uart::uart_rx_task(rx, tx).await
}

#[embassy_executor::task]
async fn button_task(pin: AnyPin) -> ! {
    ui::buttons::button_task(pin).await
}

#[embassy_executor::task]
async fn led_task(pin: AnyPin) -> ! {
    ui::led::led_task(pin).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // USB needs the 32 MHz crystal as HFCLK source.
    let mut config = embassy_nrf::config::Config::default();
    config.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(config);

    info!("serial-remote starting");

    let rx = UarteRx::new(p.UARTE0, UartIrqs, p.P0_08, uart::uart_config());

    let input = InputAggregator::new(UartSerial::new(SERIAL_BYTES.receiver()), DebouncedButton);
    let translator = TRANSLATOR.init(Mutex::new(RefCell::new(ReportTranslator::new(input))));

    let usb = usb::hid_device::init(p.USBD, translator);

    unwrap!(spawner.spawn(led_task(p.P0_13.degrade())));
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade())));
    unwrap!(spawner.spawn(uart_task(rx, SERIAL_BYTES.sender())));
    unwrap!(spawner.spawn(usb_device_task(usb.device)));
    unwrap!(spawner.spawn(hid_poll_task(usb.writer, translator)));

    info!("All tasks spawned");
}
