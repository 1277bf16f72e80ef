//! `word_list` — load and preprocess the fill dictionary.
//!
//! The solver consumes a flat list of uppercase A–Z words plus two derived
//! read-only indexes: length buckets (candidates are only ever matched
//! against slots of their own length) and a letter-frequency table used by
//! the least-constraining-value heuristic.
//!
//! Two line formats are accepted when parsing:
//! - `word;score` — entries below `min_score` are skipped;
//! - a bare alphabetic word — kept regardless of `min_score`.
//!
//! Lines that fit neither format are skipped silently (malformed scores) or
//! logged at debug level (non-alphabetic words). All surviving entries are
//! normalized to uppercase, deduplicated, and sorted by length then
//! alphabetically, so word ids are stable across runs.
//!
//! This module is WASM-friendly: `parse_from_str` works everywhere, while
//! `load_from_path` exists only on native builds.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::OnceCell;

use crate::errors::SolveError;

/// Words the solver falls back to when no dictionary can be loaded.
pub const FALLBACK_WORDS: [&str; 8] =
    ["LASER", "SAILS", "SHEET", "STEER", "HEEL", "HIKE", "KEEL", "KNOT"];

/// Index of a word within [`WordList::words`].
pub type WordId = u32;

/// A processed, ready-to-use dictionary.
///
/// Read-only after construction; a single `WordList` (behind an `Arc` if
/// needed) may be shared by any number of solver instances.
#[derive(Debug, Default)]
pub struct WordList {
    /// Uppercase entries, deduplicated, sorted by (length, alphabetical).
    words: Vec<String>,
    /// Word ids grouped by word length.
    buckets: HashMap<usize, Vec<WordId>>,
    /// Occurrences of each letter across the whole list, computed lazily.
    letter_counts: OnceCell<[u64; 26]>,
}

impl WordList {
    /// Build a word list from pre-validated candidate words.
    ///
    /// # Errors
    ///
    /// `InvalidDictionary` if any entry is empty or contains a character
    /// outside A–Z (lowercase input is accepted and uppercased).
    pub fn new<I, S>(candidates: I) -> Result<WordList, SolveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = Vec::new();
        for candidate in candidates {
            let raw = candidate.as_ref();
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(SolveError::InvalidDictionary { word: raw.to_string() });
            }
            words.push(raw.to_ascii_uppercase());
        }
        Ok(Self::from_normalized(words))
    }

    /// The built-in last-resort list.
    pub fn fallback() -> WordList {
        Self::from_normalized(FALLBACK_WORDS.iter().map(|w| (*w).to_string()).collect())
    }

    /// Parse a raw dictionary from an in-memory string (see module docs for
    /// the accepted line formats). WASM-safe: no filesystem access.
    pub fn parse_from_str(contents: &str, min_score: i32) -> WordList {
        let words = contents
            .lines()
            .filter_map(|raw_line| {
                let line = raw_line.trim();
                if line.is_empty() {
                    None
                } else if let Some((word_raw, score_raw)) = line.split_once(';') {
                    let score: i32 = score_raw.trim().parse().ok()?;
                    if score < min_score {
                        None
                    } else {
                        normalize(word_raw.trim())
                    }
                } else {
                    // Bare-word format; scoreless entries always pass.
                    normalize(line)
                }
            })
            .collect();

        Self::from_normalized(words)
    }

    /// Native-only convenience: read a dictionary file and parse it.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error (with the path in the message) if
    /// the file cannot be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path<P: AsRef<std::path::Path>>(
        path: P,
        min_score: i32,
    ) -> std::io::Result<WordList> {
        let path_ref = path.as_ref();
        let data = std::fs::read_to_string(path_ref).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to read word list from '{}': {}", path_ref.display(), e),
            )
        })?;
        Ok(Self::parse_from_str(&data, min_score))
    }

    /// Dedup, sort, and index a list of already-uppercase words.
    fn from_normalized(mut words: Vec<String>) -> WordList {
        // Alphabetical sort first so dedup sees duplicates adjacent, then
        // the (length, alphabetical) order that makes word ids stable.
        words.sort();
        words.dedup();
        words.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        let mut buckets: HashMap<usize, Vec<WordId>> = HashMap::new();
        for (id, word) in words.iter().enumerate() {
            buckets.entry(word.len()).or_default().push(id as WordId);
        }

        WordList { words, buckets, letter_counts: OnceCell::new() }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, id: WordId) -> &str {
        &self.words[id as usize]
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Ids of all words of the given length (empty slice if none).
    pub fn of_length(&self, len: usize) -> &[WordId] {
        self.buckets.get(&len).map_or(&[], Vec::as_slice)
    }

    /// Letter occurrence counts over the full list, A=0 … Z=25.
    pub fn letter_counts(&self) -> &[u64; 26] {
        self.letter_counts.get_or_init(|| {
            let mut counts = [0u64; 26];
            for word in &self.words {
                for b in word.bytes() {
                    counts[(b - b'A') as usize] += 1;
                }
            }
            counts
        })
    }

    /// Sum of letter frequencies for a word: the LCV ordering key. Lower
    /// scores (rarer letters) are tried first.
    pub fn frequency_score(&self, id: WordId) -> u64 {
        let counts = self.letter_counts();
        self.word(id).bytes().map(|b| counts[(b - b'A') as usize]).sum()
    }
}

/// Uppercase a candidate line, dropping it if anything non-alphabetic shows up.
fn normalize(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if raw.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(raw.to_ascii_uppercase())
    } else {
        debug!("skipping non-alphabetic dictionary line: \"{raw}\"");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scored_lines() {
        let input = "cat;50\ndog;60\nbird;40";
        let wl = WordList::parse_from_str(input, 45);
        assert_eq!(wl.words(), &["CAT".to_string(), "DOG".to_string()]);
    }

    #[test]
    fn parse_accepts_bare_words() {
        let input = "laser\nsails;90\nknot";
        let wl = WordList::parse_from_str(input, 50);
        assert_eq!(wl.words(), &["KNOT".to_string(), "LASER".to_string(), "SAILS".to_string()]);
    }

    #[test]
    fn parse_skips_malformed_and_non_alpha() {
        let input = "cat;50\napple;bad_score\nc4t\ndog;60\n;30\n";
        let wl = WordList::parse_from_str(input, 0);
        assert_eq!(wl.words(), &["CAT".to_string(), "DOG".to_string()]);
    }

    #[test]
    fn parse_dedups_and_orders_by_length_then_alpha() {
        let input = "dog;50\napple;50\ncat;50\nab;50\nzebra;50\nCAT;99";
        let wl = WordList::parse_from_str(input, 45);
        assert_eq!(
            wl.words(),
            &[
                "AB".to_string(),
                "CAT".to_string(),
                "DOG".to_string(),
                "APPLE".to_string(),
                "ZEBRA".to_string()
            ]
        );
    }

    #[test]
    fn new_rejects_non_alpha() {
        let err = WordList::new(["CAT", "DO G"]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidDictionary { word } if word == "DO G"));
        assert!(WordList::new(["ok", ""]).is_err());
    }

    #[test]
    fn buckets_group_by_length() {
        let wl = WordList::new(["AB", "CD", "CAT", "KNOT"]).unwrap();
        assert_eq!(wl.of_length(2).len(), 2);
        assert_eq!(wl.of_length(3).len(), 1);
        assert_eq!(wl.of_length(4).len(), 1);
        assert!(wl.of_length(9).is_empty());
        for &id in wl.of_length(2) {
            assert_eq!(wl.word(id).len(), 2);
        }
    }

    #[test]
    fn letter_counts_and_scores() {
        let wl = WordList::new(["AAB", "ABC"]).unwrap();
        let counts = wl.letter_counts();
        assert_eq!(counts[0], 3); // A
        assert_eq!(counts[1], 2); // B
        assert_eq!(counts[2], 1); // C
        let aab = wl.of_length(3)[0];
        assert_eq!(wl.word(aab), "AAB");
        assert_eq!(wl.frequency_score(aab), 3 + 3 + 2);
    }

    #[test]
    fn fallback_list_is_well_formed() {
        let wl = WordList::fallback();
        assert_eq!(wl.len(), FALLBACK_WORDS.len());
        assert!(wl.words().iter().all(|w| w.bytes().all(|b| b.is_ascii_uppercase())));
        assert_eq!(wl.of_length(4).len(), 4); // HEEL HIKE KEEL KNOT
        assert_eq!(wl.of_length(5).len(), 4); // LASER SAILS SHEET STEER
    }
}
