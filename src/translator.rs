//! Report translator - the momentary-event state machine.
//!
//! Every input symbol becomes exactly one HID report, and that report is
//! retracted by an all-zero report of the same kind on the very next
//! poll. There is no key repeat and there are no chords: at most one
//! release is ever owed.
//!
//! ```text
//!            symbol != 0x00 / emit report
//!   ┌──────┐ ─────────────────────────────▶ ┌───────────────┐
//!   │ Idle │                                │ AwaitingClear │
//!   └──────┘ ◀───────────────────────────── └───────────────┘
//!            any poll / emit released report (force send)
//! ```
//!
//! While the host session is not configured the same input instead drives
//! remote-wakeup requests (button or `'1'`).

use crate::hid::keyboard::{KeyboardReport, KEY_SPACE};
use crate::hid::media::{MediaControl, MediaControlReport};
use crate::hid::system_control::SystemControlReport;
use crate::hid::{Report, ReportKind};
use crate::input::{ButtonSource, InputAggregator, InputSymbol, SerialSource};

/// Read-only view of the USB session, owned by the USB stack.
pub trait SessionState {
    fn is_configured(&self) -> bool;
    fn remote_wakeup_enabled(&self) -> bool;
}

/// Sink for remote-wakeup requests. The USB stack owns the signalling
/// protocol and its timing.
pub trait RemoteWakeup {
    fn request_wakeup(&mut self);
}

/// What a mapped symbol does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// System Control: Sleep.
    Sleep,
    /// Keyboard: single key in slot 0.
    Key(u8),
    /// Media Control: one control flag.
    Media(MediaControl),
    /// Media Control report with no flag set. Reserved for symbols that
    /// have no assignment yet; the report is still sent and released.
    Unassigned,
}

impl Command {
    pub fn report(self) -> Report {
        match self {
            Command::Sleep => Report::SystemControl(SystemControlReport::sleep()),
            Command::Key(code) => Report::Keyboard(KeyboardReport::single_key(code)),
            Command::Media(control) => Report::MediaControl(MediaControlReport::new(control)),
            Command::Unassigned => Report::MediaControl(MediaControlReport::empty()),
        }
    }
}

/// Symbol → command table, searched in order; the first match wins.
/// Serial bytes are raw ASCII, so case matters.
pub const SYMBOL_TABLE: [(u8, Command); 14] = [
    (InputSymbol::BUTTON.0, Command::Sleep),
    (b'0', Command::Sleep),
    (b' ', Command::Key(KEY_SPACE)),
    (b'y', Command::Media(MediaControl::Play)),
    (b'e', Command::Media(MediaControl::Pause)),
    (b'f', Command::Media(MediaControl::FastForward)),
    (b'r', Command::Media(MediaControl::Rewind)),
    (b'n', Command::Media(MediaControl::NextTrack)),
    (b'p', Command::Media(MediaControl::PreviousTrack)),
    (b's', Command::Media(MediaControl::Stop)),
    (b'z', Command::Media(MediaControl::PlayPause)),
    (b'm', Command::Media(MediaControl::Mute)),
    (b'u', Command::Media(MediaControl::VolumeUp)),
    (b'd', Command::Media(MediaControl::VolumeDown)),
];

/// Symbols that ask a suspended host to resume.
pub const WAKEUP_SYMBOLS: [u8; 2] = [InputSymbol::BUTTON.0, b'1'];

/// Map a symbol to its command. `None` only for the no-input symbol;
/// every other unlisted symbol is [`Command::Unassigned`].
pub fn command_for(symbol: InputSymbol) -> Option<Command> {
    if symbol.is_none() {
        return None;
    }
    let command = SYMBOL_TABLE
        .iter()
        .find(|(s, _)| *s == symbol.0)
        .map_or(Command::Unassigned, |&(_, command)| command);
    Some(command)
}

pub fn is_wakeup_symbol(symbol: InputSymbol) -> bool {
    WAKEUP_SYMBOLS.contains(&symbol.0)
}

/// Translator state: which report kind, if any, still owes its release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TranslatorState {
    pending_clear: Option<ReportKind>,
}

impl TranslatorState {
    pub const fn new() -> Self {
        Self {
            pending_clear: None,
        }
    }

    pub fn pending_clear(&self) -> Option<ReportKind> {
        self.pending_clear
    }

    pub fn is_idle(&self) -> bool {
        self.pending_clear.is_none()
    }
}

/// A report ready for the endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CreatedReport {
    pub report: Report,
    /// Send even if the payload equals the previous one. Set on releases,
    /// whose all-zero payload may match an earlier report.
    pub force_send: bool,
}

impl CreatedReport {
    pub fn report_id(&self) -> u8 {
        self.report.report_id()
    }

    pub fn size(&self) -> usize {
        self.report.kind().payload_size()
    }
}

/// Result of one poll tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing to do this tick.
    Nothing,
    /// A report for the interrupt endpoint.
    Report(CreatedReport),
    /// A remote-wakeup request was issued.
    WakeupRequested,
}

pub struct ReportTranslator<S, B> {
    input: InputAggregator<S, B>,
    state: TranslatorState,
}

impl<S: SerialSource, B: ButtonSource> ReportTranslator<S, B> {
    pub const fn new(input: InputAggregator<S, B>) -> Self {
        Self {
            input,
            state: TranslatorState::new(),
        }
    }

    pub fn state(&self) -> TranslatorState {
        self.state
    }

    /// Run one poll tick.
    ///
    /// A configured session gets the report path, an unconfigured one the
    /// wakeup path. Exactly one of them runs, so each tick reads input at
    /// most once.
    ///
    /// When neither path may run (unconfigured, wakeup not granted) queued
    /// serial bytes are discarded instead of being replayed as commands
    /// once the host configures the device. An owed release is kept.
    pub fn tick<P, W>(&mut self, session: &P, waker: &mut W) -> TickOutcome
    where
        P: SessionState,
        W: RemoteWakeup,
    {
        if session.is_configured() {
            return match self.create_report(None) {
                Some(created) => TickOutcome::Report(created),
                None => TickOutcome::Nothing,
            };
        }

        if !session.remote_wakeup_enabled() {
            let _dropped = self.input.discard_serial();
            #[cfg(feature = "defmt")]
            {
                if _dropped > 0 {
                    defmt::debug!("Discarded {} stale serial bytes", _dropped);
                }
            }
            return TickOutcome::Nothing;
        }

        if self.maybe_request_wakeup(session, waker) {
            TickOutcome::WakeupRequested
        } else {
            TickOutcome::Nothing
        }
    }

    /// Produce this tick's report, if any.
    ///
    /// `_requested` is the kind named by a host GET_REPORT. It does not
    /// steer the state machine: the owed release or the input decides.
    pub fn create_report(&mut self, _requested: Option<ReportKind>) -> Option<CreatedReport> {
        if let Some(kind) = self.state.pending_clear.take() {
            #[cfg(feature = "defmt")]
            defmt::trace!("Releasing {}", kind);
            return Some(CreatedReport {
                report: Report::released(kind),
                force_send: true,
            });
        }

        let symbol = self.input.poll();
        let command = command_for(symbol)?;
        let report = command.report();

        #[cfg(feature = "defmt")]
        defmt::debug!("Symbol {=u8:#x} -> {}", symbol.0, command);

        self.state.pending_clear = Some(report.kind());
        Some(CreatedReport {
            report,
            force_send: false,
        })
    }

    /// Answer a host GET_REPORT for `requested`.
    ///
    /// Runs the report path exactly like a poll tick. With nothing owed and
    /// no input, the released report of the requested kind is returned.
    pub fn get_report(&mut self, requested: ReportKind) -> Report {
        self.create_report(Some(requested))
            .map_or(Report::released(requested), |created| created.report)
    }

    /// Host-to-device reports. The device declares none, so anything the
    /// host sends is accepted and dropped.
    pub fn process_incoming_report(&mut self, _report_id: u8, _data: &[u8]) {
        #[cfg(feature = "defmt")]
        defmt::trace!("Ignored report {} ({} bytes)", _report_id, _data.len());
    }

    /// Wakeup path. When the session is not configured and the host has
    /// granted remote wakeup, read one symbol and request a wakeup if it
    /// is a wake symbol. Returns whether a request was issued.
    pub fn maybe_request_wakeup<P, W>(&mut self, session: &P, waker: &mut W) -> bool
    where
        P: SessionState,
        W: RemoteWakeup,
    {
        if session.is_configured() || !session.remote_wakeup_enabled() {
            return false;
        }

        let symbol = self.input.poll();
        if !is_wakeup_symbol(symbol) {
            return false;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Remote wakeup requested by {=u8:#x}", symbol.0);
        waker.request_wakeup();
        true
    }
}
