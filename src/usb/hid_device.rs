//! USB HID device - one interface carrying keyboard, media and system
//! control reports.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral, tracks the session state the translator needs, and runs
//! the per-millisecond poll that turns translator output into endpoint
//! writes and remote-wakeup requests.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::uart::UartSerial;
use crate::ui::buttons::DebouncedButton;
use crate::ui::led;
use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use serial_remote::config;
use serial_remote::hid::{encode_with_id, SentReportFilter, MAX_REPORT_SIZE, REPORT_DESCRIPTOR};
use serial_remote::status::UsbStatus;
use serial_remote::{RemoteWakeup, ReportKind, ReportTranslator, SessionState, TickOutcome};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Report buffer size of the HID writer.
pub const HID_WRITER_SIZE: usize = config::USB_HID_EPSIZE as usize;

pub type Translator = ReportTranslator<UartSerial, DebouncedButton>;

/// The translator is driven by the poll task and by host GET_REPORT
/// requests on the control pipe; both take this lock for one call.
pub type SharedTranslator = Mutex<CriticalSectionRawMutex, RefCell<Translator>>;

static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_SESSION_HANDLER: StaticCell<UsbSessionHandler> = StaticCell::new();
static HID_REQUEST_HANDLER: StaticCell<HidRequestHandler> = StaticCell::new();

static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);
static USB_SUSPENDED: AtomicBool = AtomicBool::new(false);
static USB_REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);
static USB_REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Session flags as maintained by [`UsbSessionHandler`].
///
/// A suspended bus counts as not configured: reports cannot flow until
/// the host resumes, and that is exactly when remote wakeup applies.
pub struct UsbSession;

impl SessionState for UsbSession {
    fn is_configured(&self) -> bool {
        USB_CONFIGURED.load(Ordering::Acquire) && !USB_SUSPENDED.load(Ordering::Acquire)
    }

    fn remote_wakeup_enabled(&self) -> bool {
        USB_REMOTE_WAKEUP_ENABLED.load(Ordering::Acquire)
    }
}

/// Hands wakeup requests to the USB device task.
pub struct UsbWakeup;

impl RemoteWakeup for UsbWakeup {
    fn request_wakeup(&mut self) {
        USB_REMOTE_WAKEUP.signal(());
    }
}

struct UsbSessionHandler {
    status: UsbStatus,
}

impl UsbSessionHandler {
    fn set_status(&mut self, status: UsbStatus) {
        if status != self.status {
            self.status = status;
            led::set_status(status);
        }
    }
}

impl Handler for UsbSessionHandler {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            info!("USB enabled");
            self.set_status(self.status.on_connect());
        } else {
            info!("USB disabled");
            USB_CONFIGURED.store(false, Ordering::Release);
            USB_SUSPENDED.store(false, Ordering::Release);
            USB_REMOTE_WAKEUP_ENABLED.store(false, Ordering::Release);
            self.set_status(self.status.on_disconnect());
        }
    }

    fn reset(&mut self) {
        info!("USB bus reset");
        USB_CONFIGURED.store(false, Ordering::Release);
        USB_REMOTE_WAKEUP_ENABLED.store(false, Ordering::Release);
    }

    fn addressed(&mut self, addr: u8) {
        debug!("USB address set to {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED.store(configured, Ordering::Release);
        if configured {
            info!("USB configured");
            self.set_status(self.status.on_configuration_changed(true));
        } else {
            info!("USB no longer configured");
            self.set_status(self.status.on_connect());
        }
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended={}", suspended);
        USB_SUSPENDED.store(suspended, Ordering::Release);
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        info!("Remote wakeup enabled={}", enabled);
        USB_REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Release);
    }
}

/// Control-pipe report requests.
struct HidRequestHandler {
    translator: &'static SharedTranslator,
}

impl RequestHandler for HidRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        let ReportId::In(report_id) = id else {
            return None;
        };
        let requested = ReportKind::from_report_id(report_id)?;
        let report = self
            .translator
            .lock(|t| t.borrow_mut().get_report(requested));
        match encode_with_id(&report, buf) {
            0 => None,
            n => Some(n),
        }
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let report_id = match id {
            ReportId::In(id) | ReportId::Out(id) | ReportId::Feature(id) => id,
        };
        self.translator
            .lock(|t| t.borrow_mut().process_incoming_report(report_id, data));
        OutResponse::Accepted
    }
}

/// Build result containing the USB device runner and the HID writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub writer: HidWriter<'static, UsbDriver, HID_WRITER_SIZE>,
}

/// Initialise the USB stack and create the HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, translator: &'static SharedTranslator) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    // Build the USB device.
    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    builder.handler(USB_SESSION_HANDLER.init(UsbSessionHandler {
        status: UsbStatus::default(),
    }));

    let hid_config = HidConfig {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(HID_REQUEST_HANDLER.init(HidRequestHandler { translator })),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: config::USB_HID_EPSIZE,
    };
    let writer = HidWriter::new(&mut builder, HID_STATE.init(State::new()), hid_config);

    let device = builder.build();

    info!("USB HID device initialised (keyboard + media + system control)");

    UsbHidDevice { device, writer }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// Handles enumeration and suspend/resume. While suspended, a wakeup
/// request from the poll task resumes the bus.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");

    loop {
        device.run_until_suspend().await;
        USB_REMOTE_WAKEUP.reset();

        match select(device.wait_resume(), USB_REMOTE_WAKEUP.wait()).await {
            Either::First(()) => info!("Host resumed the bus"),
            Either::Second(()) => {
                if let Err(e) = device.remote_wakeup().await {
                    warn!("Remote wakeup failed: {}", Error::from(e));
                }
            }
        }
    }
}

/// Poll task - runs the translator once per HID poll interval and writes
/// whatever it produces to the interrupt endpoint.
pub async fn hid_poll_task(
    mut writer: HidWriter<'static, UsbDriver, HID_WRITER_SIZE>,
    translator: &'static SharedTranslator,
) -> ! {
    info!("HID poll task started");

    let session = UsbSession;
    let mut waker = UsbWakeup;
    let mut filter = SentReportFilter::new();
    let mut ticker = Ticker::every(Duration::from_millis(config::USB_HID_POLL_MS as u64));
    let mut buf = [0u8; MAX_REPORT_SIZE];

    loop {
        ticker.next().await;

        let outcome = translator.lock(|t| t.borrow_mut().tick(&session, &mut waker));

        let created = match outcome {
            TickOutcome::Report(created) => created,
            TickOutcome::WakeupRequested => {
                info!("Wakeup request queued");
                continue;
            }
            TickOutcome::Nothing => {
                if !session.is_configured() {
                    filter.reset();
                }
                continue;
            }
        };

        let n = encode_with_id(&created.report, &mut buf);
        if n == 0 {
            warn!("Report not encoded: {}", Error::BufferOverflow);
            continue;
        }

        if !filter.should_send(&buf[..n], created.force_send) {
            continue;
        }

        match writer.write(&buf[..n]).await {
            Ok(()) => {
                debug!("Sent report {=[u8]:x}", &buf[..n]);
                filter.record_sent(&buf[..n]);
            }
            Err(e) => {
                if let EndpointError::BufferOverflow = e {
                    led::set_status(UsbStatus::Error);
                }
                warn!("USB HID write failed: {}", Error::from(e));
            }
        }
    }
}
