use crate::bloom::BloomFilter;
use crate::data::WordBank;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;
use std::sync::Arc;
use std::time::Instant;

/// A set of membership flags. The empty set means the candidate is missing from the dictionary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Membership(u8);

impl Membership {
    /// The candidate is neither a word nor part of one.
    pub const MISSING: Membership = Membership(0);
    /// The candidate is a substring of some word, read in either direction.
    pub const PART: Membership = Membership(1);
    /// The candidate is a word.
    pub const COMPLETE_FORWARD: Membership = Membership(1 << 1);
    /// The reversed candidate is a word.
    pub const COMPLETE_BACKWARD: Membership = Membership(1 << 2);

    /// Returns `true` iff every flag in `other` is set in `self`.
    pub fn contains(self, other: Membership) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_missing(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Membership {
    type Output = Membership;

    fn bitor(self, rhs: Membership) -> Membership {
        Membership(self.0 | rhs.0)
    }
}

impl BitOrAssign for Membership {
    fn bitor_assign(&mut self, rhs: Membership) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            return write!(f, "MISSING");
        }
        let names: Vec<&str> = [
            (Membership::PART, "PART"),
            (Membership::COMPLETE_FORWARD, "COMPLETE_FORWARD"),
            (Membership::COMPLETE_BACKWARD, "COMPLETE_BACKWARD"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();
        write!(f, "{}", names.join(" | "))
    }
}

/// The answer to a dictionary query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub membership: Membership,
    /// The length of the longest word that contains the candidate, when the dictionary knows it.
    pub potential: Option<usize>,
}

impl CheckResult {
    pub fn is_part(&self) -> bool {
        self.membership.contains(Membership::PART)
    }

    pub fn is_complete_forward(&self) -> bool {
        self.membership.contains(Membership::COMPLETE_FORWARD)
    }

    pub fn is_complete_backward(&self) -> bool {
        self.membership.contains(Membership::COMPLETE_BACKWARD)
    }

    /// Returns `true` iff extending the candidate could still produce a word longer than
    /// `best_length`.
    ///
    /// Without a potential bound, any part of a word is worth extending.
    pub fn may_exceed(&self, best_length: usize) -> bool {
        self.is_part() && self.potential.map_or(true, |potential| potential > best_length)
    }
}

/// A dictionary index that search strategies query while exploring the board.
pub trait Dictionary {
    /// Checks whether the candidate, or its reversal, is a word, and whether it is part of one.
    fn check(&self, candidate: &str) -> CheckResult;

    /// Picks a random word with exactly `length` letters.
    fn get_word(&self, length: usize, rng: &mut dyn RngCore) -> Option<Arc<str>>;
}

impl<D: Dictionary + ?Sized> Dictionary for &D {
    fn check(&self, candidate: &str) -> CheckResult {
        (**self).check(candidate)
    }

    fn get_word(&self, length: usize, rng: &mut dyn RngCore) -> Option<Arc<str>> {
        (**self).get_word(length, rng)
    }
}

pub(crate) fn reverse(word: &str) -> String {
    word.chars().rev().collect()
}

/// Calls `on_part` with every substring of the word, and with the reversal of each substring.
///
/// Substrings range from single letters up to the whole word.
fn for_each_part(word: &str, mut on_part: impl FnMut(String)) {
    let letters: Vec<char> = word.chars().collect();
    for start in 0..letters.len() {
        for end in start + 1..=letters.len() {
            let part = &letters[start..end];
            on_part(part.iter().collect());
            on_part(part.iter().rev().collect());
        }
    }
}

fn choose_word<'a, I>(words: I, length: usize, rng: &mut dyn RngCore) -> Option<Arc<str>>
where
    I: Iterator<Item = &'a Arc<str>>,
{
    let mut matching: Vec<&Arc<str>> = words
        .filter(|word| word.chars().count() == length)
        .collect();
    // Hash set order differs between runs, so sort to make seeded choices reproducible.
    matching.sort_unstable();
    matching.choose(rng).map(|word| Arc::clone(word))
}

/// An exact dictionary index: every word, and every substring mapped to the length of the
/// longest word that contains it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactDictionary {
    words: HashSet<Arc<str>>,
    parts: HashMap<String, usize>,
}

impl ExactDictionary {
    /// Builds the index from the words in the bank.
    ///
    /// Substrings are collected in parallel, one map per worker, then merged.
    pub fn new(bank: &WordBank) -> ExactDictionary {
        let start = Instant::now();
        let parts = bank
            .par_iter()
            .fold(HashMap::new, |mut parts: HashMap<String, usize>, word| {
                let length = word.chars().count();
                for_each_part(word, |part| {
                    let potential = parts.entry(part).or_insert(0);
                    *potential = (*potential).max(length);
                });
                parts
            })
            .reduce(HashMap::new, |mut merged, parts| {
                for (part, length) in parts {
                    let potential = merged.entry(part).or_insert(0);
                    *potential = (*potential).max(length);
                }
                merged
            });
        let dictionary = ExactDictionary {
            words: bank.iter().map(Arc::clone).collect(),
            parts,
        };
        info!(
            "Built exact dictionary with {} words and {} parts in {:.3}s",
            dictionary.words.len(),
            dictionary.parts.len(),
            start.elapsed().as_secs_f64()
        );
        dictionary
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }
}

impl Dictionary for ExactDictionary {
    fn check(&self, candidate: &str) -> CheckResult {
        let mut membership = Membership::MISSING;
        if self.words.contains(candidate) {
            membership |= Membership::COMPLETE_FORWARD;
        }
        if self.words.contains(reverse(candidate).as_str()) {
            membership |= Membership::COMPLETE_BACKWARD;
        }
        let potential = self.parts.get(candidate).copied();
        if potential.is_some() {
            membership |= Membership::PART;
        }
        CheckResult {
            membership,
            potential,
        }
    }

    fn get_word(&self, length: usize, rng: &mut dyn RngCore) -> Option<Arc<str>> {
        choose_word(self.words.iter(), length, rng)
    }
}

/// Sizing of the Bloom filters behind an [`ApproximateDictionary`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub expected_words: usize,
    pub expected_parts: usize,
    /// Target false-positive rate of each filter.
    pub error_rate: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            expected_words: 64_000,
            expected_parts: 700_000,
            error_rate: 1e-6,
        }
    }
}

/// A dictionary index backed by two Bloom filters, one for words and one for substrings.
///
/// Lookups may report false positives at about the configured error rate, but never false
/// negatives. It cannot report a potential bound, so searches using it prune less.
///
/// The plain word list is kept as well, so that [`Dictionary::get_word`] still works.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApproximateDictionary {
    config: FilterConfig,
    words_filter: BloomFilter,
    parts_filter: BloomFilter,
    words: Vec<Arc<str>>,
}

impl ApproximateDictionary {
    pub fn new(bank: &WordBank, config: FilterConfig) -> ApproximateDictionary {
        let start = Instant::now();
        let mut words_filter = BloomFilter::new(config.expected_words, config.error_rate);
        let mut parts_filter = BloomFilter::new(config.expected_parts, config.error_rate);
        let mut num_parts = 0;
        for word in bank.iter() {
            words_filter.insert(&**word);
            for_each_part(word, |part| {
                parts_filter.insert(part.as_str());
                num_parts += 1;
            });
        }
        if num_parts > config.expected_parts * 2 {
            // Duplicates are counted too, so only warn well past the configured capacity.
            warn!(
                "Inserted {} parts into a filter sized for {}; expect more false positives",
                num_parts,
                config.expected_parts
            );
        }
        info!(
            "Built approximate dictionary with {} words in {:.3}s",
            bank.len(),
            start.elapsed().as_secs_f64()
        );
        ApproximateDictionary {
            config,
            words_filter,
            parts_filter,
            words: bank.to_vec(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }
}

impl Dictionary for ApproximateDictionary {
    fn check(&self, candidate: &str) -> CheckResult {
        let mut membership = Membership::MISSING;
        if self.words_filter.contains(candidate) {
            membership |= Membership::COMPLETE_FORWARD;
        }
        if self.words_filter.contains(reverse(candidate).as_str()) {
            membership |= Membership::COMPLETE_BACKWARD;
        }
        if self.parts_filter.contains(candidate) {
            membership |= Membership::PART;
        }
        CheckResult {
            membership,
            potential: None,
        }
    }

    fn get_word(&self, length: usize, rng: &mut dyn RngCore) -> Option<Arc<str>> {
        choose_word(self.words.iter(), length, rng)
    }
}
