// Orchestration: events in, corrected words out.
//
// The composer drives the full pipeline for one session: segment events
// into chords, map each chord through the weighted key map into a
// pseudo-word, correct it against the lexicon, and join the results with
// single spaces. End-of-stream is the caller's concern — the event loop
// that feeds the composer decides when to stop (the CLI stops on the
// configured sentinel note and discards any chord left in progress).

use crate::keymap::WeightedKeyMap;
use crate::lexicon::Lexicon;
use crate::segmenter::ChordSegmenter;
use crate::types::NoteEvent;
use rand::Rng;

/// One session's pipeline state: segmenter, key map, lexicon, and the
/// words produced so far.
pub struct Composer {
    segmenter: ChordSegmenter,
    keymap: WeightedKeyMap,
    lexicon: Lexicon,
    words: Vec<String>,
}

impl Composer {
    pub fn new(keymap: WeightedKeyMap, lexicon: Lexicon) -> Self {
        Composer {
            segmenter: ChordSegmenter::new(),
            keymap,
            lexicon,
            words: Vec::new(),
        }
    }

    /// Feed one event. When the event completes a chord, the chord is
    /// mapped, shuffled, corrected, appended to the session text, and the
    /// corrected word is returned.
    pub fn feed<R: Rng>(&mut self, event: NoteEvent, rng: &mut R) -> Option<String> {
        let chord = self.segmenter.on_event(event)?;
        let pseudo = self.keymap.map_chord(&chord, rng);
        if pseudo.is_empty() {
            // Every chord note was outside the key map's range. Cannot
            // happen when the transport boundary validates, but an empty
            // word would corrupt the joined text.
            log::debug!("chord {chord:?} mapped to no letters, skipping");
            return None;
        }
        log::debug!("chord {chord:?} -> pseudo-word '{pseudo}'");
        let word = self.lexicon.pick(&pseudo, rng);
        self.words.push(word.clone());
        Some(word)
    }

    /// Words produced so far, in chord-emission order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Consume the composer and return the session text: all corrected
    /// words joined by single spaces.
    pub fn finish(self) -> String {
        self.words.join(" ")
    }

    /// Drive a whole event sequence through `feed` and return the session
    /// text. The iterator is expected to end at the stream's end-of-stream
    /// sentinel (exclusive).
    pub fn compose<I, R>(events: I, keymap: WeightedKeyMap, lexicon: Lexicon, rng: &mut R) -> String
    where
        I: IntoIterator<Item = NoteEvent>,
        R: Rng,
    {
        let mut composer = Composer::new(keymap, lexicon);
        for event in events {
            composer.feed(event, rng);
        }
        composer.finish()
    }
}
