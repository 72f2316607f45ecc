// Session configuration.
//
// All tunable parameters live in `SessionConfig`, loadable from JSON at
// startup (JSON string in, typed struct out). Every field has a default so
// a partial config file only overrides what it names. The defaults match
// an 88-key piano with C8 reserved as the stop sentinel.

use crate::types::{NoteId, NoteRange};
use serde::{Deserialize, Serialize};

/// Default maximum search radius for dictionary correction. Edit-distance
/// queries become unselective at large radii, so the expansion is capped.
pub const DEFAULT_MAX_RADIUS: u32 = 10;

/// Default end-of-stream sentinel: C8, one above the playable range.
pub const DEFAULT_STOP_NOTE: NoteId = 108;

/// Tunable parameters for one recording session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Valid note ids; events outside this range are rejected at the
    /// transport boundary.
    pub note_range: NoteRange,
    /// Maximum radius for the expanding dictionary search.
    pub max_radius: u32,
    /// Striking this note ends the recording. Must lie outside
    /// `note_range` or it can never be played as part of a chord.
    pub stop_note: NoteId,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            note_range: NoteRange::PIANO,
            max_radius: DEFAULT_MAX_RADIUS,
            stop_note: DEFAULT_STOP_NOTE,
        }
    }
}

impl SessionConfig {
    /// Parse a config from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
