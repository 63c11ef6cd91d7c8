//! Reassembly of satellite lists spread over several GSV sentences.

use crate::field::Fields;

/// Largest group that can be tracked, one bit per sentence.
pub const MAX_GSV_SENTENCES: u8 = 8;

/// State of the GSV group currently being received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GsvGroup {
    /// Next satellite slot to fill, persists across the group's sentences.
    index: u8,
    /// Bit `n - 1` is set once sentence `n` passed its checksum.
    received: u8,
    total: u8,
    sentence_no: u8,
    /// Union of the fields touched by the group's committed sentences.
    touched: Fields,
}

impl GsvGroup {
    #[inline]
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Moves on to the next satellite slot.
    #[inline]
    pub fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    pub fn set_total(&mut self, total: u8) {
        self.total = total;
    }

    /// Records the number of the sentence being received. The first
    /// sentence of a group always starts over, so that leftovers of an
    /// incomplete group never mix with the new one.
    pub fn set_sentence_no(&mut self, sentence_no: u8) {
        self.sentence_no = sentence_no;
        if sentence_no == 1 {
            self.restart();
        }
    }

    /// Commits a sentence that passed its checksum. Returns the fields to mark
    /// ready once every sentence of the group arrived.
    pub fn commit(&mut self, touched: Fields) -> Option<Fields> {
        if self.sentence_no == 0 || self.sentence_no > MAX_GSV_SENTENCES {
            return None;
        }
        self.received |= 1 << (self.sentence_no - 1);
        self.touched |= touched;

        if self.total == 0 || self.total > MAX_GSV_SENTENCES {
            return None;
        }
        let complete = ((1u16 << self.total) - 1) as u8;
        if self.received != complete {
            return None;
        }

        let touched = self.touched;
        self.restart();
        Some(touched)
    }

    /// Drops a partially received group. Satellite slots already written
    /// stay in place but will never be marked ready.
    pub fn discard(&mut self) {
        self.restart();
    }

    fn restart(&mut self) {
        self.index = 0;
        self.received = 0;
        self.touched = Fields::empty();
    }
}
