//! Lexical relevance scoring between a query and a corpus entry.
//!
//! The score is a weighted blend of three signals computed over
//! normalized text:
//!
//! - **Jaccard** token-set similarity between the query and the entry's
//!   question-plus-keywords text (weight 0.5)
//! - **substring containment** in either direction (weight 0.3)
//! - **keyword hit**: any entry keyword appearing inside the query (weight 0.2)
//!
//! The weights are calibration constants tuned against the shipped corpus
//! and must not be changed without re-validating the escalation threshold.

use std::collections::HashSet;

use crate::corpus::CorpusEntry;
use crate::text::{normalize, tokenize};

/// Jaccard similarity weight.
pub const W_JACCARD: f64 = 0.5;
/// Substring containment weight.
pub const W_SUBSTRING: f64 = 0.3;
/// Keyword hit weight.
pub const W_KEYWORD: f64 = 0.2;

/// The individual signals behind a match score.
///
/// The escalation policy re-examines `keyword_hit` and `is_substring`
/// separately from the blended score, so they are kept alongside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSignals {
    pub jaccard: f64,
    pub is_substring: bool,
    pub keyword_hit: bool,
    pub score: f64,
}

/// Score a query against one corpus entry. Returns a value in `[0, 1]`.
pub fn score(query: &str, entry: &CorpusEntry) -> MatchSignals {
    let q_norm = normalize(query);
    let entry_text = format!("{} {}", entry.question, entry.keywords.join(" "));
    let i_norm = normalize(&entry_text);

    let is_substring = substring_either_way(&q_norm, &i_norm);
    let keyword_hit = keyword_hit(&q_norm, entry);
    let jaccard = jaccard(&tokenize(&q_norm), &tokenize(&i_norm));

    let score = W_JACCARD * jaccard
        + W_SUBSTRING * if is_substring { 1.0 } else { 0.0 }
        + W_KEYWORD * if keyword_hit { 1.0 } else { 0.0 };

    MatchSignals {
        jaccard,
        is_substring,
        keyword_hit,
        score,
    }
}

/// Containment check in either direction over already-normalized text.
pub fn substring_either_way(a_norm: &str, b_norm: &str) -> bool {
    a_norm.contains(b_norm) || b_norm.contains(a_norm)
}

/// True if any of the entry's keywords occurs (normalized) inside the
/// normalized query.
pub fn keyword_hit(query_norm: &str, entry: &CorpusEntry) -> bool {
    entry
        .keywords
        .iter()
        .any(|kw| query_norm.contains(&normalize(kw)))
}

/// Jaccard similarity of two token multisets, treated as sets.
///
/// The union is floor-clamped to 1 so two empty token sets score 0
/// rather than dividing by zero.
pub fn jaccard(a_tokens: &[String], b_tokens: &[String]) -> f64 {
    let a: HashSet<&str> = a_tokens.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b_tokens.iter().map(String::as_str).collect();

    let intersection = a.intersection(&b).count();
    let union = (a.len() + b.len() - intersection).max(1);

    intersection as f64 / union as f64
}
