// Dictionary correction: maps a pseudo-word to a nearby real word.
//
// The corpus is a line-oriented dictionary source (hunspell-style) where
// each line carries a leading word token, a '/' or ' ' delimiter, and
// trailing annotation. Tokens that are entirely uppercase (abbreviations,
// proper-noun stubs) or contain digits are dropped; the rest are lowercased
// and indexed in a BK-tree under edit distance.
//
// `pick` searches with an expanding radius: query at radius 0, then 1, 2,
// ... up to the configured cap, and at the first non-empty radius choose
// uniformly among that batch of candidates. Picking from the batch rather
// than the single globally nearest word is intentional — it introduces
// variety into the generated text. If the cap is exhausted the input
// passes through unchanged.

use crate::bktree::BkTree;
use crate::error::BuildError;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Leading word token immediately followed by the corpus delimiter.
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+)[/ ]").expect("valid regex"));

/// Any digit anywhere in the token.
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));

/// Minimum number of single-character insertions, deletions, and
/// substitutions transforming `a` into `b`. Two-row dynamic program over
/// chars, O(|a|*|b|) time and O(|b|) space.
pub fn edit_distance(a: &str, b: &str) -> u32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len() as u32;
    }
    if b.is_empty() {
        return a.len() as u32;
    }

    let mut previous: Vec<u32> = (0..=b.len() as u32).collect();
    let mut current = vec![0u32; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i as u32 + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = previous[j] + u32::from(ca != cb);
            let delete = previous[j + 1] + 1;
            let insert = current[j] + 1;
            current[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Extract acceptable word tokens from corpus lines: the leading word of
/// each matching line, skipping all-uppercase tokens and tokens with
/// digits, lowercased.
pub fn filter_words<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let captures = WORD.captures(line)?;
            let word = &captures[1];
            if NUMBER.is_match(word) || is_all_uppercase(word) {
                return None;
            }
            Some(word.to_lowercase())
        })
        .collect()
}

/// True when the token has cased characters and none of them lowercase.
fn is_all_uppercase(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

// The metric type is fixed by the tree's payload, hence `&String`.
#[allow(clippy::ptr_arg)]
fn word_distance(a: &String, b: &String) -> u32 {
    edit_distance(a, b)
}

type WordMetric = fn(&String, &String) -> u32;

/// A dictionary indexed for approximate lookup.
#[derive(Debug)]
pub struct Lexicon {
    tree: BkTree<String, WordMetric>,
    max_radius: u32,
}

impl Lexicon {
    /// Filter a raw corpus source and index the surviving words. Fails if
    /// filtering leaves nothing — an empty lexicon would "correct" every
    /// pseudo-word to nothing useful.
    pub fn from_corpus(text: &str, max_radius: u32) -> Result<Self, BuildError> {
        Lexicon::from_words(filter_words(text.lines()), max_radius)
    }

    /// Index pre-tokenized words directly (callers with their own
    /// tokenization, and tests).
    pub fn from_words<I>(words: I, max_radius: u32) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = String>,
    {
        let tree = BkTree::new(word_distance as WordMetric, words)
            .map_err(|_| BuildError::EmptyCorpus)?;
        Ok(Lexicon { tree, max_radius })
    }

    /// Number of indexed words.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The configured search-radius cap.
    pub fn max_radius(&self) -> u32 {
        self.max_radius
    }

    /// Correct `word` to a nearby dictionary word.
    ///
    /// Queries at radius 0, 1, 2, ... and returns a uniformly random
    /// candidate from the first non-empty batch, so an exact dictionary
    /// word always corrects to itself. Returns the input unchanged when no
    /// radius up to the cap matches.
    pub fn pick<R: Rng>(&self, word: &str, rng: &mut R) -> String {
        let probe = word.to_string();
        for radius in 0..=self.max_radius {
            let candidates = self.tree.query(&probe, radius);
            if !candidates.is_empty() {
                let (d, choice) = candidates[rng.random_range(0..candidates.len())];
                log::debug!("'{word}' found '{choice}' at distance {d}");
                return choice.clone();
            }
        }
        log::debug!("'{word}' found nothing within radius {}", self.max_radius);
        word.to_string()
    }
}
