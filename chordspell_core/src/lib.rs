// Chordspell core: turns chords played on a keyboard into real words.
//
// Pipeline, leaf-first:
// - `bktree.rs`: generic BK-tree, a metric-space index with range queries.
// - `lexicon.rs`: edit distance + corpus filtering, a BK-tree over a word
//   corpus with expanding-radius correction.
// - `keymap.rs`: frequency-weighted random assignment of letters to notes.
// - `segmenter.rs`: state machine grouping note events into chords.
// - `composer.rs`: orchestration — chord -> letters -> pseudo-word ->
//   corrected word -> joined session text.
// - `types.rs` / `config.rs` / `error.rs`: shared vocabulary, session
//   parameters, construction errors.
//
// Data flow: raw events -> ChordSegmenter -> Chord -> WeightedKeyMap ->
// pseudo-word -> Lexicon -> corrected word -> Composer -> text.
//
// Determinism: every randomized step (letter draws, chord shuffles,
// correction tie-breaks) takes `&mut impl Rng`, so a seeded `StdRng`
// reproduces a whole session. The key map and lexicon are built once per
// session and read-only afterwards; nothing is persisted across runs.
//
// The MIDI transport, command line, and speech synthesis live outside this
// crate — see `chordspell_cli` for the event-vocabulary boundary.

pub mod bktree;
pub mod composer;
pub mod config;
pub mod error;
pub mod keymap;
pub mod lexicon;
pub mod segmenter;
pub mod types;

pub use bktree::BkTree;
pub use composer::Composer;
pub use config::SessionConfig;
pub use error::BuildError;
pub use keymap::{FrequencyTable, WeightedKeyMap};
pub use lexicon::{Lexicon, edit_distance};
pub use segmenter::{Chord, ChordSegmenter, SegmenterState};
pub use types::{NoteEvent, NoteId, NoteRange};
