// Core event vocabulary shared by every component.
//
// A `NoteId` is a raw MIDI-style pitch number. The valid range is carried
// by `NoteRange` (a configuration value, not derived from input) and is
// enforced at the boundary that translates raw transport events into
// `NoteEvent`s — see `chordspell_cli`'s midi module. Components inside the
// core may therefore assume in-range notes on their hot paths.

use serde::{Deserialize, Serialize};

/// A distinct pitch identifier. Plain `u8`, matching the MIDI note byte.
pub type NoteId = u8;

/// Inclusive range of valid note ids.
///
/// The default covers the 88 keys of a piano: A0 (21) through B7 (107).
/// C8 (108) is deliberately outside the range so it can serve as the
/// end-of-stream sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRange {
    /// Lowest valid note id (inclusive).
    pub low: NoteId,
    /// Highest valid note id (inclusive).
    pub high: NoteId,
}

impl NoteRange {
    /// The 88-key piano range, A0..=B7.
    pub const PIANO: NoteRange = NoteRange { low: 21, high: 107 };

    /// Whether `note` falls inside the range.
    pub fn contains(&self, note: NoteId) -> bool {
        self.low <= note && note <= self.high
    }

    /// Number of note ids in the range.
    pub fn len(&self) -> usize {
        (self.high - self.low) as usize + 1
    }

    /// A well-formed range (`low <= high`) is never empty.
    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// Iterate over every note id in the range.
    pub fn iter(self) -> impl Iterator<Item = NoteId> {
        self.low..=self.high
    }
}

/// One event from the note stream: a key was pressed or released.
///
/// Timestamps from the transport layer are dropped before events reach
/// the core; only ordering matters for chord segmentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteEvent {
    /// A note began sounding.
    Start(NoteId),
    /// A note stopped sounding.
    Stop(NoteId),
}

impl NoteEvent {
    /// The note id this event refers to.
    pub fn note(&self) -> NoteId {
        match *self {
            NoteEvent::Start(n) | NoteEvent::Stop(n) => n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piano_range() {
        assert_eq!(NoteRange::PIANO.len(), 88);
        assert!(NoteRange::PIANO.contains(21));
        assert!(NoteRange::PIANO.contains(107));
        assert!(!NoteRange::PIANO.contains(108));
        assert!(!NoteRange::PIANO.contains(20));
    }

    #[test]
    fn test_range_iter_covers_all() {
        let range = NoteRange { low: 60, high: 63 };
        let notes: Vec<NoteId> = range.iter().collect();
        assert_eq!(notes, vec![60, 61, 62, 63]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_event_note() {
        assert_eq!(NoteEvent::Start(60).note(), 60);
        assert_eq!(NoteEvent::Stop(64).note(), 64);
    }
}
