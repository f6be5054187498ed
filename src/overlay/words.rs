/*!
 * Word normalization and contiguous-run location.
 *
 * Phrases are compared word by word after normalization, so that
 * `"Don't!"` and `"dont"` are treated as the same word.
 */

use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;

/// Anything that is not a Unicode word character
static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w]+").unwrap()
});

/// Canonical form of a token: lower-cased with all non-word characters removed.
///
/// Empty input (or input made only of punctuation) yields an empty string;
/// callers building a [`WordSequence`] drop those.
pub fn normalize(word: &str) -> String {
    NON_WORD_REGEX.replace_all(&word.to_lowercase(), "").into_owned()
}

/// Ordered list of normalized, non-empty words
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WordSequence(Vec<String>);

impl WordSequence {
    /// Build a sequence from already-normalized words, dropping empties
    pub fn new(words: Vec<String>) -> Self {
        WordSequence(words.into_iter().filter(|w| !w.is_empty()).collect())
    }

    /// Split a phrase on whitespace and normalize every token
    pub fn from_phrase(phrase: &str) -> Self {
        WordSequence(
            phrase
                .split_whitespace()
                .map(normalize)
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Contiguous slice as a new sequence
    pub fn slice(&self, start: usize, len: usize) -> WordSequence {
        WordSequence(self.0[start..start + len].to_vec())
    }

    /// Whether `needle` occurs as a contiguous run in this sequence
    pub fn contains_run(&self, needle: &WordSequence) -> bool {
        contains_run(&self.0, &needle.0)
    }
}

impl fmt::Display for WordSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Contiguous run of words inside a phrase's raw token list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start_index: usize,
    pub length: usize,
}

impl HighlightSpan {
    /// The "no highlight" span
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether token `index` falls inside the span
    pub fn contains(&self, index: usize) -> bool {
        !self.is_empty() && index >= self.start_index && index < self.start_index + self.length
    }
}

/// Whether `needle` occurs contiguously inside `haystack`.
///
/// An empty needle is contained in any haystack.
pub fn contains_run<S: AsRef<str>>(haystack: &[S], needle: &[S]) -> bool {
    if needle.is_empty() {
        return true;
    }
    first_run_start(haystack, needle).is_some()
}

fn first_run_start<S: AsRef<str>>(haystack: &[S], needle: &[S]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&start| {
        needle
            .iter()
            .enumerate()
            .all(|(j, word)| haystack[start + j].as_ref() == word.as_ref())
    })
}

/// Leftmost contiguous occurrence of `needle` in `haystack`.
///
/// Returns an empty span when either side is empty or nothing matches.
pub fn locate<S: AsRef<str>>(haystack: &[S], needle: &[S]) -> HighlightSpan {
    if needle.is_empty() || haystack.is_empty() {
        return HighlightSpan::empty();
    }
    match first_run_start(haystack, needle) {
        Some(start_index) => {
            debug!("Found subsequence starting at index {}", start_index);
            HighlightSpan { start_index, length: needle.len() }
        }
        None => {
            debug!("Continuous subsequence not found");
            HighlightSpan::empty()
        }
    }
}

/// Locate `target` inside `phrase`, indexing the phrase's raw tokens.
///
/// Every whitespace token of the phrase keeps its position, including tokens
/// that normalize to nothing (such as a lone dash), so the returned span can be
/// applied directly to `phrase.split_whitespace()`.
pub fn locate_in_phrase(phrase: &str, target: &str) -> HighlightSpan {
    let haystack: Vec<String> = phrase.split_whitespace().map(normalize).collect();
    let needle = WordSequence::from_phrase(target);
    locate(&haystack, needle.words())
}
