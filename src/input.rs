//! Input aggregation - merges the serial byte stream and the button into
//! one input symbol per poll tick.
//!
//! Serial has strict priority: a pending byte is always returned before
//! the button is even looked at. Neither source may block, since this is
//! called from inside the USB poll.

/// One input symbol, produced fresh every poll tick.
///
/// `0x00` means no input and `0x01` is the button alias. Anything else is
/// a raw serial byte, interpreted as a command character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSymbol(pub u8);

impl InputSymbol {
    pub const NONE: InputSymbol = InputSymbol(0x00);
    pub const BUTTON: InputSymbol = InputSymbol(0x01);

    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

/// Non-blocking access to received serial bytes.
pub trait SerialSource {
    /// Take the next received byte, if any, without waiting.
    fn try_receive_byte(&mut self) -> Option<u8>;
}

/// Debounced button level.
pub trait ButtonSource {
    fn is_pressed(&self) -> bool;
}

/// Merges a [`SerialSource`] and a [`ButtonSource`].
pub struct InputAggregator<S, B> {
    serial: S,
    button: B,
}

impl<S: SerialSource, B: ButtonSource> InputAggregator<S, B> {
    pub const fn new(serial: S, button: B) -> Self {
        Self { serial, button }
    }

    /// Produce this tick's symbol, consuming at most one serial byte.
    pub fn poll(&mut self) -> InputSymbol {
        if let Some(byte) = self.serial.try_receive_byte() {
            return InputSymbol(byte);
        }

        if self.button.is_pressed() {
            return InputSymbol::BUTTON;
        }

        InputSymbol::NONE
    }

    /// Drop every byte already queued on the serial side without looking
    /// at the button. Returns how many were dropped.
    pub fn discard_serial(&mut self) -> usize {
        let mut dropped = 0;
        while self.serial.try_receive_byte().is_some() {
            dropped += 1;
        }
        dropped
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn button(&self) -> &B {
        &self.button
    }
}
