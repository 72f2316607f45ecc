// Construction-time errors.
//
// Everything here is fatal and surfaces before a session starts: a
// degenerate frequency table or an empty dictionary would silently corrupt
// every word produced afterwards, so the affected component refuses to
// construct instead. Run-time event anomalies (duplicate starts, unmatched
// stops) are not errors — the segmenter absorbs and logs those, because
// live event sources are not assumed reliable.

use thiserror::Error;

/// A fatal error while building a session component.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("frequency table has no entries")]
    EmptyFrequencyTable,

    #[error("frequency table line {line}: expected \"letter weight\", got {content:?}")]
    MalformedFrequencyLine { line: usize, content: String },

    #[error("frequency table line {line}: letter {letter:?} has zero weight, weights must be positive")]
    ZeroWeight { line: usize, letter: char },

    #[error("corpus contains no usable words after filtering")]
    EmptyCorpus,

    #[error("cannot build a metric index over an empty payload sequence")]
    EmptyIndex,
}
