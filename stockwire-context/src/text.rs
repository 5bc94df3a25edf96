//! Lexical normalization for the stockwire retrieval engine.
//!
//! Everything the indexer and retriever know about text goes through this
//! module: raw news snippets are normalized into lowercase alphanumeric terms,
//! grouped into bounded term windows, and counted into term-frequency tables.
//! Both the write path (indexing) and the read path (query scoring) call the
//! same [`tokenize`] so that a stored chunk and a query agree on what a term is.
//!
//! The module defines:
//! - [`tokenize`]: text to an ordered sequence of terms.
//! - [`TermFrequencies`]: an ordered term → count table with a stable
//!   `[term, count]` pair encoding.
//! - [`TermWindow`] and [`chunk_terms`]: fixed-size windows over a term sequence.
//!
//! # Example
//!
//! ```
//! use stockwire_context::text::{chunk_terms, term_frequencies, tokenize};
//!
//! let terms = tokenize("Acme beats estimates. Acme Corp reported strong quarterly growth");
//! assert_eq!(terms.len(), 9);
//!
//! let windows = chunk_terms(&terms, 4);
//! assert_eq!(windows.len(), 3);
//! assert_eq!(windows[2].text(), "growth");
//!
//! let tf = term_frequencies(&terms);
//! assert_eq!(tf.get("acme"), 2);
//! ```
use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Anything that is not a lowercase ASCII letter, a digit or whitespace.
static NON_TERM_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());

/// Normalizes raw text into a sequence of lowercase alphanumeric terms.
///
/// The text is lower-cased, every character outside `[a-z0-9]` and whitespace
/// becomes a space, and the result is split on whitespace runs. Empty input
/// yields an empty sequence; this function never fails.
///
/// # Examples
/// ```
/// use stockwire_context::tokenize;
///
/// assert_eq!(tokenize("Q3: EPS $1.20 (beat)"), vec!["q3", "eps", "1", "20", "beat"]);
/// assert!(tokenize("  --  ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_TERM_CHAR
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Per-chunk mapping of term to occurrence count.
///
/// Keys are unique and every count is at least 1. The table is kept ordered
/// so its serialized form is identical for identical content. It serializes
/// as a list of `[term, count]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies(BTreeMap<String, u32>);

impl TermFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `term`.
    pub fn increment(&mut self, term: &str) {
        *self.0.entry(term.to_string()).or_insert(0) += 1;
    }

    /// Count for `term`, 0 when absent.
    pub fn get(&self, term: &str) -> u32 {
        self.0.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term) > 0
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts, i.e. the number of terms the table was built from.
    pub fn total(&self) -> usize {
        self.0.values().map(|&count| count as usize).sum()
    }

    /// Distinct terms with their counts, in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(term, &count)| (term.as_str(), count))
    }
}

impl Serialize for TermFrequencies {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (term, count) in &self.0 {
            seq.serialize_element(&(term, count))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for TermFrequencies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(String, u32)>::deserialize(deserializer)?;
        let mut table = BTreeMap::new();
        for (term, count) in pairs {
            if count == 0 {
                return Err(serde::de::Error::custom(format!(
                    "term '{term}' has a zero count"
                )));
            }
            if table.insert(term.clone(), count).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "term '{term}' appears more than once"
                )));
            }
        }
        Ok(Self(table))
    }
}

/// Counts term occurrences.
pub fn term_frequencies<S: AsRef<str>>(terms: &[S]) -> TermFrequencies {
    let mut tf = TermFrequencies::new();
    for term in terms {
        tf.increment(term.as_ref());
    }
    tf
}

/// A consecutive run of at most `chunk_size` terms taken from one document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TermWindow {
    /// Position of this window within its document (0-indexed).
    pub sequence: usize,
    /// The terms, in their original order.
    pub terms: Vec<String>,
}

impl TermWindow {
    /// The window's terms joined with single spaces.
    pub fn text(&self) -> String {
        self.terms.join(" ")
    }
}

/// Splits a term sequence into consecutive windows of at most `chunk_size`
/// terms, preserving order. Only the last window may be shorter, and an empty
/// sequence produces no windows. A `chunk_size` of 0 is treated as 1.
///
/// # Examples
/// ```
/// use stockwire_context::{chunk_terms, tokenize};
///
/// let terms = tokenize("one two three four five");
/// let windows = chunk_terms(&terms, 2);
/// let texts: Vec<String> = windows.iter().map(|w| w.text()).collect();
/// assert_eq!(texts, vec!["one two", "three four", "five"]);
/// assert!(chunk_terms(&[] as &[String], 2).is_empty());
/// ```
pub fn chunk_terms(terms: &[String], chunk_size: usize) -> Vec<TermWindow> {
    terms
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(sequence, window)| TermWindow {
            sequence,
            terms: window.to_vec(),
        })
        .collect()
}
