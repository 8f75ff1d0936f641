//! Duplicate-report suppression at the endpoint.
//!
//! The interrupt endpoint only carries a report when its bytes differ
//! from the previous one sent, unless the translator asks to force the
//! send. Releases are forced because an all-zero payload can equal an
//! earlier release of the same kind.

use super::MAX_REPORT_SIZE;

#[derive(Clone, Copy, Debug)]
pub struct SentReportFilter {
    last: [u8; MAX_REPORT_SIZE],
    len: usize,
}

impl SentReportFilter {
    pub const fn new() -> Self {
        Self {
            last: [0; MAX_REPORT_SIZE],
            len: 0,
        }
    }

    /// Whether `encoded` should go out on the endpoint.
    pub fn should_send(&self, encoded: &[u8], force_send: bool) -> bool {
        force_send || encoded != &self.last[..self.len]
    }

    /// Remember `encoded` as the last report the host received.
    pub fn record_sent(&mut self, encoded: &[u8]) {
        let len = encoded.len().min(MAX_REPORT_SIZE);
        self.last[..len].copy_from_slice(&encoded[..len]);
        self.len = len;
    }

    /// Forget the last report, e.g. after a bus reset.
    pub fn reset(&mut self) {
        self.len = 0;
    }
}

impl Default for SentReportFilter {
    fn default() -> Self {
        Self::new()
    }
}
