//! Integration tests for the poll loop: input aggregation, translation,
//! release and remote wakeup, driven through fake collaborators.

use std::cell::Cell;
use std::rc::Rc;

use heapless::{Deque, Vec};
use serial_remote::hid::keyboard::KEY_SPACE;
use serial_remote::hid::{
    encode_with_id, KeyboardReport, MediaControl, MediaControlReport, SentReportFilter,
    SystemControlReport, MAX_REPORT_SIZE,
};
use serial_remote::translator::{command_for, SYMBOL_TABLE};
use serial_remote::{
    ButtonSource, CreatedReport, InputAggregator, InputSymbol, RemoteWakeup, Report, ReportKind,
    ReportTranslator, SerialSource, SessionState, TickOutcome,
};

// ═══════════════════════════════════════════════════════════════════════════
// Fake collaborators
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct FakeSerial {
    bytes: Deque<u8, 32>,
    reads: Rc<Cell<usize>>,
}

impl FakeSerial {
    fn with(bytes: &[u8]) -> Self {
        let mut serial = Self::default();
        for &b in bytes {
            serial.bytes.push_back(b).unwrap();
        }
        serial
    }
}

impl SerialSource for FakeSerial {
    fn try_receive_byte(&mut self) -> Option<u8> {
        self.reads.set(self.reads.get() + 1);
        self.bytes.pop_front()
    }
}

#[derive(Clone, Default)]
struct FakeButton {
    held: Rc<Cell<bool>>,
}

impl ButtonSource for FakeButton {
    fn is_pressed(&self) -> bool {
        self.held.get()
    }
}

struct FakeSession {
    configured: bool,
    remote_wakeup_enabled: bool,
}

const CONFIGURED: FakeSession = FakeSession {
    configured: true,
    remote_wakeup_enabled: false,
};

const WAKEABLE: FakeSession = FakeSession {
    configured: false,
    remote_wakeup_enabled: true,
};

const SUSPENDED: FakeSession = FakeSession {
    configured: false,
    remote_wakeup_enabled: false,
};

impl SessionState for FakeSession {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn remote_wakeup_enabled(&self) -> bool {
        self.remote_wakeup_enabled
    }
}

#[derive(Default)]
struct FakeWakeup {
    requests: usize,
}

impl RemoteWakeup for FakeWakeup {
    fn request_wakeup(&mut self) {
        self.requests += 1;
    }
}

type Translator = ReportTranslator<FakeSerial, FakeButton>;

fn translator(serial: &[u8]) -> (Translator, FakeButton, Rc<Cell<usize>>) {
    let serial = FakeSerial::with(serial);
    let reads = serial.reads.clone();
    let button = FakeButton::default();
    let translator = ReportTranslator::new(InputAggregator::new(serial, button.clone()));
    (translator, button, reads)
}

fn expect_report(outcome: TickOutcome) -> CreatedReport {
    match outcome {
        TickOutcome::Report(created) => created,
        other => panic!("expected a report, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_a_play_then_auto_release() {
    let (mut t, _, _) = translator(b"y");
    let mut waker = FakeWakeup::default();

    let press = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(
        press.report,
        Report::MediaControl(MediaControlReport::new(MediaControl::Play))
    );
    assert!(!press.force_send);

    let release = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(release.report, Report::released(ReportKind::MediaControl));
    assert!(release.force_send);

    assert_eq!(t.tick(&CONFIGURED, &mut waker), TickOutcome::Nothing);
    assert_eq!(waker.requests, 0);
}

#[test]
fn scenario_b_single_read_through_tick() {
    let (mut t, button, reads) = translator(b"");
    button.held.set(true);
    let mut waker = FakeWakeup::default();

    let outcome = t.tick(&WAKEABLE, &mut waker);

    assert_eq!(outcome, TickOutcome::WakeupRequested);
    assert_eq!(waker.requests, 1);
    assert_eq!(reads.get(), 1);
    // The wakeup path never arms a release.
    assert!(t.state().is_idle());
}

#[test]
fn scenario_b_two_reads_when_both_paths_called() {
    let (mut t, button, reads) = translator(b"");
    button.held.set(true);
    let mut waker = FakeWakeup::default();

    let created = t.create_report(None).unwrap();
    let woke = t.maybe_request_wakeup(&WAKEABLE, &mut waker);

    assert_eq!(
        created.report,
        Report::SystemControl(SystemControlReport::sleep())
    );
    assert!(woke);
    assert_eq!(waker.requests, 1);
    assert_eq!(reads.get(), 2);
}

#[test]
fn scenario_b_serial_byte_consumed_by_one_path_only() {
    let (mut t, _, _) = translator(b"1");
    let mut waker = FakeWakeup::default();

    assert!(t.maybe_request_wakeup(&WAKEABLE, &mut waker));
    // The '1' went to the wakeup path; nothing is left for the report path.
    assert_eq!(t.create_report(None), None);
}

#[test]
fn scenario_c_zero_char_matches_button() {
    let (mut by_serial, _, _) = translator(b"0");
    let (mut by_button, button, _) = translator(b"");
    button.held.set(true);

    let a = by_serial.create_report(None).unwrap();
    let b = by_button.create_report(None).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.report,
        Report::SystemControl(SystemControlReport::sleep())
    );
}

#[test]
fn scenario_d_space_then_release() {
    let (mut t, _, _) = translator(b" ");
    let mut waker = FakeWakeup::default();

    let press = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(
        press.report,
        Report::Keyboard(KeyboardReport::single_key(KEY_SPACE))
    );

    let release = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(release.report, Report::Keyboard(KeyboardReport::empty()));
    assert!(release.force_send);
}

// ═══════════════════════════════════════════════════════════════════════════
// Properties over the whole symbol space
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn every_mapped_symbol_sets_exactly_one_field() {
    for (symbol, _) in SYMBOL_TABLE {
        // The button symbol never arrives over serial.
        let (mut t, button, _) = if symbol == InputSymbol::BUTTON.0 {
            translator(&[])
        } else {
            translator(&[symbol])
        };
        button.held.set(symbol == InputSymbol::BUTTON.0);

        let created = t.create_report(None).unwrap();
        assert_eq!(created.report.pressed_count(), 1, "symbol {:#04x}", symbol);
        assert_eq!(t.state().pending_clear(), Some(created.report.kind()));
    }
}

#[test]
fn every_unmapped_symbol_is_inert_media_report() {
    for symbol in 0x02..=0xFFu8 {
        if SYMBOL_TABLE.iter().any(|(s, _)| *s == symbol) {
            continue;
        }
        let (mut t, _, _) = translator(&[symbol]);
        let created = t.create_report(None).unwrap();
        assert_eq!(created.report, Report::released(ReportKind::MediaControl));
        assert!(!created.force_send);
        assert_eq!(t.state().pending_clear(), Some(ReportKind::MediaControl));
    }
}

#[test]
fn pending_clear_ignores_input_and_never_repeats() {
    // Continuous input: a command byte every tick, plus the button held.
    let bytes: Vec<u8, 32> = b"yefrnpszmud yefrnpszmud".iter().copied().collect();
    let (mut t, button, reads) = translator(&bytes);
    button.held.set(true);
    let mut waker = FakeWakeup::default();

    let mut previous_was_press = false;
    for _ in 0..40 {
        let reads_before = reads.get();
        let created = expect_report(t.tick(&CONFIGURED, &mut waker));
        if previous_was_press {
            // Release tick: no input consumed, all-zero, forced.
            assert_eq!(reads.get(), reads_before);
            assert!(created.report.is_released());
            assert!(created.force_send);
            assert!(t.state().is_idle());
        } else {
            assert!(t.state().pending_clear().is_some());
        }
        previous_was_press = !previous_was_press;
    }
}

#[test]
fn no_input_is_idempotent() {
    let (mut t, _, _) = translator(b"");
    let mut waker = FakeWakeup::default();
    for _ in 0..5 {
        assert_eq!(t.tick(&CONFIGURED, &mut waker), TickOutcome::Nothing);
        assert!(t.state().is_idle());
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Remote wakeup
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn wakeup_requires_host_permission() {
    let (mut t, button, _) = translator(b"1");
    button.held.set(true);
    let mut waker = FakeWakeup::default();

    assert_eq!(t.tick(&SUSPENDED, &mut waker), TickOutcome::Nothing);
    assert_eq!(t.tick(&SUSPENDED, &mut waker), TickOutcome::Nothing);
    assert_eq!(waker.requests, 0);
}

#[test]
fn serial_bytes_queued_while_unconfigured_are_not_replayed() {
    let (mut t, _, reads) = translator(b"yyyyyyyy");
    let mut waker = FakeWakeup::default();

    assert_eq!(t.tick(&SUSPENDED, &mut waker), TickOutcome::Nothing);
    // Eight bytes plus the empty read that ends the drain.
    assert_eq!(reads.get(), 9);

    assert_eq!(t.tick(&CONFIGURED, &mut waker), TickOutcome::Nothing);
}

#[test]
fn draining_keeps_owed_release_and_button() {
    let (mut t, button, _) = translator(b"u");
    let mut waker = FakeWakeup::default();

    expect_report(t.tick(&CONFIGURED, &mut waker));
    button.held.set(true);
    assert_eq!(t.tick(&SUSPENDED, &mut waker), TickOutcome::Nothing);

    let release = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(release.report, Report::released(ReportKind::MediaControl));
    let press = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(
        press.report,
        Report::SystemControl(SystemControlReport::sleep())
    );
}

#[test]
fn wakeup_ignores_other_symbols() {
    let (mut t, _, _) = translator(b"0y");
    let mut waker = FakeWakeup::default();

    assert_eq!(t.tick(&WAKEABLE, &mut waker), TickOutcome::Nothing);
    assert_eq!(t.tick(&WAKEABLE, &mut waker), TickOutcome::Nothing);
    assert_eq!(waker.requests, 0);
}

#[test]
fn one_request_per_wake_symbol() {
    let (mut t, _, _) = translator(b"11");
    let mut waker = FakeWakeup::default();

    for _ in 0..3 {
        t.tick(&WAKEABLE, &mut waker);
    }
    assert_eq!(waker.requests, 2);
}

#[test]
fn wakeup_path_not_taken_while_configured() {
    let (mut t, _, _) = translator(b"1");
    let mut waker = FakeWakeup::default();
    assert!(!t.maybe_request_wakeup(&CONFIGURED, &mut waker));
    // The report path gets the '1' instead, as the inert media report.
    assert_eq!(
        command_for(InputSymbol(b'1')).map(|c| c.report().kind()),
        Some(ReportKind::MediaControl)
    );
    let created = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert!(created.report.is_released());
}

#[test]
fn release_owed_across_suspend_is_sent_after_resume() {
    let (mut t, _, _) = translator(b"u");
    let mut waker = FakeWakeup::default();

    expect_report(t.tick(&CONFIGURED, &mut waker));
    assert_eq!(t.tick(&SUSPENDED, &mut waker), TickOutcome::Nothing);
    assert_eq!(t.state().pending_clear(), Some(ReportKind::MediaControl));

    let release = expect_report(t.tick(&CONFIGURED, &mut waker));
    assert!(release.force_send);
    assert!(release.report.is_released());
}

// ═══════════════════════════════════════════════════════════════════════════
// Endpoint behaviour
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn endpoint_sees_press_and_release_for_repeated_commands() {
    let (mut t, _, _) = translator(b"mm");
    let mut waker = FakeWakeup::default();
    let mut filter = SentReportFilter::new();
    let mut sent: Vec<Vec<u8, MAX_REPORT_SIZE>, 8> = Vec::new();

    for _ in 0..6 {
        if let TickOutcome::Report(created) = t.tick(&CONFIGURED, &mut waker) {
            let mut buf = [0u8; MAX_REPORT_SIZE];
            let n = encode_with_id(&created.report, &mut buf);
            if filter.should_send(&buf[..n], created.force_send) {
                filter.record_sent(&buf[..n]);
                sent.push(Vec::from_slice(&buf[..n]).unwrap()).unwrap();
            }
        }
    }

    let press: &[u8] = &[2, 0x00, 0x01];
    let release: &[u8] = &[2, 0x00, 0x00];
    let expected = [press, release, press, release];
    assert_eq!(sent.len(), expected.len());
    for (got, want) in sent.iter().zip(expected) {
        assert_eq!(got.as_slice(), want);
    }
}

#[test]
fn inert_report_is_suppressed_but_release_is_forced() {
    let (mut t, _, _) = translator(b"X");
    let mut waker = FakeWakeup::default();
    let mut filter = SentReportFilter::new();
    filter.record_sent(&[2, 0x00, 0x00]);

    let press = expect_report(t.tick(&CONFIGURED, &mut waker));
    let mut buf = [0u8; MAX_REPORT_SIZE];
    let n = encode_with_id(&press.report, &mut buf);
    assert!(!filter.should_send(&buf[..n], press.force_send));

    let release = expect_report(t.tick(&CONFIGURED, &mut waker));
    let n = encode_with_id(&release.report, &mut buf);
    assert!(filter.should_send(&buf[..n], release.force_send));
}
