// Weighted key mapping: assigns one letter to every note id in the range.
//
// The assignment is randomized at setup and deterministic at use. Each
// note draws its letter independently from the frequency table (weighted
// sampling with replacement), so several notes commonly share a letter —
// just as several piano keys may "spell" an 'e'. Regenerating the map
// produces a different assignment unless the caller seeds the RNG.
//
// The draw walks the cumulative-weight sequence with a binary search,
// O(log k) per note for an alphabet of k letters. All randomness comes
// through the injected `Rng`, so tests can pin a seed.

use crate::error::BuildError;
use crate::segmenter::Chord;
use crate::types::{NoteId, NoteRange};
use rand::Rng;
use rand::seq::SliceRandom;

/// A letter-frequency table: each letter paired with a positive weight.
///
/// Entry order is preserved from the source so that a fixed seed yields a
/// fixed key map.
#[derive(Clone, Debug)]
pub struct FrequencyTable {
    entries: Vec<(char, u32)>,
    total: u32,
}

impl FrequencyTable {
    /// Build from explicit (letter, weight) pairs. Fails on an empty table
    /// or any zero weight.
    pub fn new(entries: Vec<(char, u32)>) -> Result<Self, BuildError> {
        if entries.is_empty() {
            return Err(BuildError::EmptyFrequencyTable);
        }
        for (line, &(letter, weight)) in entries.iter().enumerate() {
            if weight == 0 {
                return Err(BuildError::ZeroWeight {
                    line: line + 1,
                    letter,
                });
            }
        }
        let total = entries.iter().map(|&(_, w)| w).sum();
        Ok(FrequencyTable { entries, total })
    }

    /// Parse a line-oriented table: one "letter weight" pair per line,
    /// whitespace-separated. Blank lines are skipped. Malformed lines and
    /// non-positive weights are fatal.
    pub fn parse(text: &str) -> Result<Self, BuildError> {
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let mut fields = raw.split_whitespace();
            let (letter, weight) = match (fields.next(), fields.next(), fields.next()) {
                (Some(l), Some(w), None) => (l, w),
                _ => {
                    return Err(BuildError::MalformedFrequencyLine {
                        line,
                        content: raw.to_string(),
                    });
                }
            };
            let mut chars = letter.chars();
            let letter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(BuildError::MalformedFrequencyLine {
                        line,
                        content: raw.to_string(),
                    });
                }
            };
            let weight: u32 = weight.parse().map_err(|_| BuildError::MalformedFrequencyLine {
                line,
                content: raw.to_string(),
            })?;
            if weight == 0 {
                return Err(BuildError::ZeroWeight { line, letter });
            }
            entries.push((letter, weight));
        }
        FrequencyTable::new(entries)
    }

    /// Sum of all weights. Always positive for a constructed table.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// The (letter, weight) pairs in source order.
    pub fn entries(&self) -> &[(char, u32)] {
        &self.entries
    }
}

/// A fixed note-to-letter assignment for one session.
#[derive(Clone, Debug)]
pub struct WeightedKeyMap {
    range: NoteRange,
    /// One letter per note, indexed by `note - range.low`.
    letters: Vec<char>,
}

impl WeightedKeyMap {
    /// Draw one letter per note in `range`, weighted by `table`.
    ///
    /// Builds the cumulative-weight sequence once, then for each note
    /// draws a uniform integer in `[0, total)` and binary-searches for the
    /// first cumulative entry exceeding it.
    pub fn generate<R: Rng>(table: &FrequencyTable, range: NoteRange, rng: &mut R) -> Self {
        let mut cumulative = Vec::with_capacity(table.entries().len());
        let mut running = 0u32;
        for &(letter, weight) in table.entries() {
            running += weight;
            cumulative.push((running, letter));
        }

        let letters = range
            .iter()
            .map(|_| {
                let draw = rng.random_range(0..table.total());
                let idx = cumulative.partition_point(|&(end, _)| end <= draw);
                cumulative[idx].1
            })
            .collect();

        WeightedKeyMap { range, letters }
    }

    /// The note range this map covers.
    pub fn range(&self) -> NoteRange {
        self.range
    }

    /// The letter assigned to `note`, or `None` outside the configured
    /// range. No mapping is defined for out-of-range notes; the transport
    /// boundary rejects them before they reach a chord.
    pub fn letter_for(&self, note: NoteId) -> Option<char> {
        if !self.range.contains(note) {
            return None;
        }
        Some(self.letters[(note - self.range.low) as usize])
    }

    /// Map a chord to its pseudo-word: one letter per member note,
    /// shuffled into a uniformly random order before concatenation so the
    /// text carries no trace of pitch order.
    pub fn map_chord<R: Rng>(&self, chord: &Chord, rng: &mut R) -> String {
        let mut letters: Vec<char> = chord.notes().filter_map(|n| self.letter_for(n)).collect();
        letters.shuffle(rng);
        letters.into_iter().collect()
    }

    /// Build a map with explicit letter assignments, for tests that need
    /// a pinned note-to-letter correspondence.
    #[cfg(test)]
    pub(crate) fn fixed(range: NoteRange, letters: Vec<char>) -> Self {
        assert_eq!(letters.len(), range.len());
        WeightedKeyMap { range, letters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_table() {
        let table = FrequencyTable::parse("a 1\nb 2\n\nc 3\n").unwrap();
        assert_eq!(table.entries(), &[('a', 1), ('b', 2), ('c', 3)]);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = FrequencyTable::parse("a 1\nbogus\n").unwrap_err();
        assert_eq!(
            err,
            BuildError::MalformedFrequencyLine {
                line: 2,
                content: "bogus".to_string()
            }
        );
        assert!(FrequencyTable::parse("ab 3\n").is_err());
        assert!(FrequencyTable::parse("a one\n").is_err());
        assert!(FrequencyTable::parse("a 1 extra\n").is_err());
    }

    #[test]
    fn test_parse_rejects_zero_weight() {
        let err = FrequencyTable::parse("a 1\nb 0\n").unwrap_err();
        assert_eq!(err, BuildError::ZeroWeight { line: 2, letter: 'b' });
    }

    #[test]
    fn test_parse_rejects_empty_table() {
        assert_eq!(
            FrequencyTable::parse("\n\n").unwrap_err(),
            BuildError::EmptyFrequencyTable
        );
        assert_eq!(
            FrequencyTable::new(vec![]).unwrap_err(),
            BuildError::EmptyFrequencyTable
        );
    }

    #[test]
    fn test_letter_for_is_total_and_deterministic() {
        let table = FrequencyTable::new(vec![('a', 1), ('b', 1), ('c', 2)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let keymap = WeightedKeyMap::generate(&table, NoteRange::PIANO, &mut rng);
        for note in NoteRange::PIANO.iter() {
            let first = keymap.letter_for(note);
            assert!(first.is_some());
            assert_eq!(keymap.letter_for(note), first);
        }
        assert_eq!(keymap.letter_for(0), None);
        assert_eq!(keymap.letter_for(108), None);
    }

    #[test]
    fn test_same_seed_same_map() {
        let table = FrequencyTable::new(vec![('a', 3), ('b', 5)]).unwrap();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let map1 = WeightedKeyMap::generate(&table, NoteRange::PIANO, &mut rng1);
        let map2 = WeightedKeyMap::generate(&table, NoteRange::PIANO, &mut rng2);
        for note in NoteRange::PIANO.iter() {
            assert_eq!(map1.letter_for(note), map2.letter_for(note));
        }
    }

    #[test]
    fn test_draw_frequencies_follow_weights() {
        // {a:1, b:1, c:2}: in the long run 'c' should take ~50% of notes,
        // 'a' and 'b' ~25% each. 200 maps over 88 keys = 17600 draws;
        // a 2% tolerance is ~4 standard errors.
        let table = FrequencyTable::new(vec![('a', 1), ('b', 1), ('c', 2)]).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 3];
        let mut draws = 0usize;
        for _ in 0..200 {
            let keymap = WeightedKeyMap::generate(&table, NoteRange::PIANO, &mut rng);
            for note in NoteRange::PIANO.iter() {
                match keymap.letter_for(note).unwrap() {
                    'a' => counts[0] += 1,
                    'b' => counts[1] += 1,
                    'c' => counts[2] += 1,
                    other => panic!("unexpected letter {other:?}"),
                }
                draws += 1;
            }
        }
        let freq = |c: usize| c as f64 / draws as f64;
        assert!((freq(counts[0]) - 0.25).abs() < 0.02, "a: {}", freq(counts[0]));
        assert!((freq(counts[1]) - 0.25).abs() < 0.02, "b: {}", freq(counts[1]));
        assert!((freq(counts[2]) - 0.50).abs() < 0.02, "c: {}", freq(counts[2]));
    }

    #[test]
    fn test_map_chord_uses_assigned_letters() {
        let range = NoteRange { low: 60, high: 64 };
        let keymap = WeightedKeyMap::fixed(range, vec!['a', 'b', 'c', 'd', 'e']);
        let chord: Chord = [60, 62, 64].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        let word = keymap.map_chord(&chord, &mut rng);
        let mut letters: Vec<char> = word.chars().collect();
        letters.sort_unstable();
        assert_eq!(letters, vec!['a', 'c', 'e']);
    }

    #[test]
    fn test_map_chord_skips_unmapped_notes() {
        let range = NoteRange { low: 60, high: 61 };
        let keymap = WeightedKeyMap::fixed(range, vec!['a', 'b']);
        let chord: Chord = [59, 60].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(keymap.map_chord(&chord, &mut rng), "a");
    }
}
