// Chord segmentation: groups a note-event stream into discrete chords.
//
// The segmenter is a two-state machine. SILENT means no note is currently
// held; SOUNDING means at least one is. Notes accumulate in `pending` from
// the moment they are first struck, and a chord is emitted exactly on the
// SOUNDING -> SILENT transition (the last held note released). Emission
// drains `pending`, so each chord is the set of every note struck since
// the previous chord completed, whether or not they overlapped the whole
// time.
//
// Live event sources are not reliable: hardware and drivers emit duplicate
// presses and stops with no matching start. Those are absorbed here (and
// logged at debug) rather than propagated — preserving a long recording
// session matters more than strict protocol validation.

use crate::types::{NoteEvent, NoteId};
use std::collections::BTreeSet;

/// A completed chord: the set of notes struck together between two
/// silences. No duplicates, order irrelevant. Emitted once by the
/// segmenter and consumed once by the composer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chord {
    notes: BTreeSet<NoteId>,
}

impl Chord {
    /// The member notes, in ascending id order.
    pub fn notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.notes.iter().copied()
    }

    /// Number of distinct notes in the chord.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn contains(&self, note: NoteId) -> bool {
        self.notes.contains(&note)
    }
}

impl FromIterator<NoteId> for Chord {
    fn from_iter<I: IntoIterator<Item = NoteId>>(iter: I) -> Self {
        Chord {
            notes: iter.into_iter().collect(),
        }
    }
}

/// The two conceptual states of the segmenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmenterState {
    /// No note is currently held.
    Silent,
    /// At least one note is held.
    Sounding,
}

/// Groups an unbounded event stream into chords.
///
/// Invariant: `pending` is always a superset of `active`.
#[derive(Debug, Default)]
pub struct ChordSegmenter {
    /// Notes currently held down.
    active: BTreeSet<NoteId>,
    /// Notes struck since the last emitted chord.
    pending: BTreeSet<NoteId>,
}

impl ChordSegmenter {
    pub fn new() -> Self {
        ChordSegmenter::default()
    }

    /// Current state. Initial state is SILENT with nothing pending.
    pub fn state(&self) -> SegmenterState {
        if self.active.is_empty() {
            SegmenterState::Silent
        } else {
            SegmenterState::Sounding
        }
    }

    /// Apply one event and return the chord completed by it, if any.
    ///
    /// A chord is returned exactly when this event drives the state from
    /// SOUNDING to SILENT.
    pub fn on_event(&mut self, event: NoteEvent) -> Option<Chord> {
        match event {
            NoteEvent::Start(note) => self.on_note_start(note),
            NoteEvent::Stop(note) => self.on_note_stop(note),
        }
        if self.is_chord_complete() {
            Some(self.take_chord())
        } else {
            None
        }
    }

    /// Record a key press. A duplicate press (start without an intervening
    /// stop) is a protocol violation from the event source; it is treated
    /// as idempotent.
    pub fn on_note_start(&mut self, note: NoteId) {
        if !self.active.insert(note) {
            log::debug!("duplicate start for note {note}, already active");
        }
        self.pending.insert(note);
    }

    /// Record a key release. A stop with no matching start is a protocol
    /// violation; it is ignored so the session can continue.
    pub fn on_note_stop(&mut self, note: NoteId) {
        if !self.active.remove(&note) {
            log::debug!("stop for note {note} with no matching start, ignoring");
        }
    }

    /// True exactly when the active set just returned to empty while notes
    /// are still pending, i.e. a chord is ready to be taken.
    pub fn is_chord_complete(&self) -> bool {
        self.active.is_empty() && !self.pending.is_empty()
    }

    /// Take the pending chord and reset the accumulator.
    ///
    /// Only meaningful when `is_chord_complete()` — called in any other
    /// state this returns an empty chord and changes nothing.
    pub fn take_chord(&mut self) -> Chord {
        if !self.is_chord_complete() {
            return Chord::default();
        }
        Chord {
            notes: std::mem::take(&mut self.pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(notes: &[NoteId]) -> Chord {
        notes.iter().copied().collect()
    }

    #[test]
    fn test_single_note_chord() {
        let mut seg = ChordSegmenter::new();
        assert_eq!(seg.state(), SegmenterState::Silent);
        assert_eq!(seg.on_event(NoteEvent::Start(60)), None);
        assert_eq!(seg.state(), SegmenterState::Sounding);
        assert_eq!(seg.on_event(NoteEvent::Stop(60)), Some(chord(&[60])));
        assert_eq!(seg.state(), SegmenterState::Silent);
    }

    #[test]
    fn test_overlapping_notes_form_one_chord() {
        // 60 and 64 overlap; 67 is struck after 60 released but before
        // silence, so all three belong to the same chord.
        let mut seg = ChordSegmenter::new();
        assert_eq!(seg.on_event(NoteEvent::Start(60)), None);
        assert_eq!(seg.on_event(NoteEvent::Start(64)), None);
        assert_eq!(seg.on_event(NoteEvent::Stop(60)), None);
        assert_eq!(seg.on_event(NoteEvent::Start(67)), None);
        assert_eq!(seg.on_event(NoteEvent::Stop(64)), None);
        assert_eq!(seg.on_event(NoteEvent::Stop(67)), Some(chord(&[60, 64, 67])));
    }

    #[test]
    fn test_no_emission_while_sounding() {
        let mut seg = ChordSegmenter::new();
        seg.on_note_start(60);
        seg.on_note_start(64);
        seg.on_note_stop(60);
        // One note still active: not complete, take_chord is a no-op.
        assert_eq!(seg.state(), SegmenterState::Sounding);
        assert!(!seg.is_chord_complete());
        assert_eq!(seg.take_chord(), Chord::default());
        // The pending set survived the premature take.
        seg.on_note_stop(64);
        assert_eq!(seg.take_chord(), chord(&[60, 64]));
    }

    #[test]
    fn test_take_chord_when_silent_and_empty() {
        let mut seg = ChordSegmenter::new();
        assert!(!seg.is_chord_complete());
        assert_eq!(seg.take_chord(), Chord::default());
    }

    #[test]
    fn test_duplicate_start_is_idempotent() {
        let mut seg = ChordSegmenter::new();
        seg.on_note_start(60);
        seg.on_note_start(60);
        assert_eq!(seg.on_event(NoteEvent::Stop(60)), Some(chord(&[60])));
    }

    #[test]
    fn test_unmatched_stop_is_ignored() {
        let mut seg = ChordSegmenter::new();
        assert_eq!(seg.on_event(NoteEvent::Stop(60)), None);
        assert_eq!(seg.state(), SegmenterState::Silent);
        // A normal chord still works afterwards.
        seg.on_note_start(64);
        assert_eq!(seg.on_event(NoteEvent::Stop(64)), Some(chord(&[64])));
    }

    #[test]
    fn test_chord_union_equals_all_started_notes() {
        // For a balanced sequence, the union of emitted chords must equal
        // the set of all distinct notes started during the session.
        let events = [
            NoteEvent::Start(60),
            NoteEvent::Start(64),
            NoteEvent::Stop(64),
            NoteEvent::Stop(60),
            NoteEvent::Start(72),
            NoteEvent::Stop(72),
            NoteEvent::Start(40),
            NoteEvent::Start(41),
            NoteEvent::Stop(40),
            NoteEvent::Stop(41),
        ];
        let mut seg = ChordSegmenter::new();
        let mut emitted = BTreeSet::new();
        let mut started = BTreeSet::new();
        for event in events {
            if let NoteEvent::Start(n) = event {
                started.insert(n);
            }
            if let Some(chord) = seg.on_event(event) {
                assert_eq!(seg.state(), SegmenterState::Silent);
                emitted.extend(chord.notes());
            }
        }
        assert_eq!(emitted, started);
    }
}
