//! Serial command input over UARTE0.
//!
//! A receive task reads one byte at a time and pushes it into a bounded
//! channel. The poll loop drains that channel without waiting through
//! [`UartSerial`]. The receive task is the only producer and the poll loop
//! the only consumer.

use crate::error::Error;
use defmt::{info, warn};
use embassy_nrf::peripherals;
use embassy_nrf::uarte::{self, Baudrate, UarteRx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use serial_remote::config::{SERIAL_QUEUE_DEPTH, UART_BAUD_RATE};
use serial_remote::SerialSource;

pub type ByteChannel = Channel<CriticalSectionRawMutex, u8, SERIAL_QUEUE_DEPTH>;
pub type ByteSender = Sender<'static, CriticalSectionRawMutex, u8, SERIAL_QUEUE_DEPTH>;
pub type ByteReceiver = Receiver<'static, CriticalSectionRawMutex, u8, SERIAL_QUEUE_DEPTH>;

/// UARTE configuration for the command port (8N1, no flow control).
pub fn uart_config() -> uarte::Config {
    let mut config = uarte::Config::default();
    config.parity = uarte::Parity::EXCLUDED;
    config.baudrate = baudrate(UART_BAUD_RATE);
    config
}

fn baudrate(rate: u32) -> Baudrate {
    match rate {
        0..=1200 => Baudrate::BAUD1200,
        1201..=2400 => Baudrate::BAUD2400,
        2401..=4800 => Baudrate::BAUD4800,
        4801..=9600 => Baudrate::BAUD9600,
        9601..=19200 => Baudrate::BAUD19200,
        19201..=38400 => Baudrate::BAUD38400,
        38401..=57600 => Baudrate::BAUD57600,
        _ => Baudrate::BAUD115200,
    }
}

/// Non-blocking end of the byte queue.
pub struct UartSerial {
    rx: ByteReceiver,
}

impl UartSerial {
    pub fn new(rx: ByteReceiver) -> Self {
        Self { rx }
    }
}

impl SerialSource for UartSerial {
    fn try_receive_byte(&mut self) -> Option<u8> {
        self.rx.try_receive().ok()
    }
}

/// Receive loop - must be spawned as a dedicated Embassy task.
///
/// Bytes that arrive while the queue is full are dropped; the poll loop
/// drains one byte per millisecond, far faster than the line rate.
pub async fn uart_rx_task(mut rx: UarteRx<'static, peripherals::UARTE0>, tx: ByteSender) -> ! {
    info!("UART receive task started ({} baud)", UART_BAUD_RATE);

    let mut byte = [0u8; 1];

    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                if tx.try_send(byte[0]).is_err() {
                    warn!("Serial byte dropped: {}", Error::UartOverflow);
                }
            }
            Err(e) => {
                warn!("UART read failed: {}", Error::from(e));
            }
        }
    }
}
