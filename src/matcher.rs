//! Corpus matching and the answer-or-escalate policy.
//!
//! [`best_match`] scans the whole corpus and keeps the arg-max scoring
//! entry. Ties break in favor of the first entry encountered (strict `>`
//! comparison), which makes results deterministic for a fixed corpus order.
//!
//! [`decide`] applies a two-tier policy on top of the best score: the
//! primary relevance threshold, plus keyword/substring overrides that
//! rescue literal matches the blended score under-ranks when the query
//! and question differ a lot in length.

use crate::corpus::{Corpus, CorpusEntry};
use crate::score::{self, MatchSignals};
use crate::text::normalize;

/// Minimum blended score required to answer without an override.
pub const MIN_RELEVANCE: f64 = 0.3;

/// The arg-max scoring corpus entry for a query.
#[derive(Debug, Clone)]
pub struct BestMatch<'a> {
    pub entry: &'a CorpusEntry,
    pub signals: MatchSignals,
}

/// Outcome of the escalation policy.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<'a> {
    /// Return the matched entry's answer synchronously.
    Answer { entry: &'a CorpusEntry, score: f64 },
    /// No confident match: route the query to human triage.
    Escalate,
}

/// Scan every corpus entry and return the highest-scoring one.
///
/// Returns `None` only for an empty corpus. No early exit: every entry is
/// scored so the result does not depend on incidental ordering beyond the
/// documented first-seen tie-break.
pub fn best_match<'a>(query: &str, corpus: &'a Corpus) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;

    for entry in corpus.entries() {
        let signals = score::score(query, entry);
        let beats = match &best {
            Some(b) => signals.score > b.signals.score,
            None => true,
        };
        if beats {
            best = Some(BestMatch { entry, signals });
        }
    }

    best
}

/// Apply the escalation policy to a query's best match.
///
/// Escalates iff there is no match at all, or the score is below
/// [`MIN_RELEVANCE`] with neither a keyword hit nor a substring
/// containment against the winning entry's question. The overrides are
/// recomputed here against the question alone (not question+keywords),
/// matching the policy's original calibration.
pub fn decide<'a>(query: &str, best: Option<&BestMatch<'a>>) -> Decision<'a> {
    let best = match best {
        Some(b) => b,
        None => return Decision::Escalate,
    };

    let q_norm = normalize(query);
    let keyword_hit = score::keyword_hit(&q_norm, best.entry);
    let is_substring = score::substring_either_way(&q_norm, &normalize(&best.entry.question));

    if best.signals.score < MIN_RELEVANCE && !keyword_hit && !is_substring {
        Decision::Escalate
    } else {
        Decision::Answer {
            entry: best.entry,
            score: best.signals.score,
        }
    }
}

/// Convenience wrapper: match then decide.
pub fn match_query<'a>(query: &str, corpus: &'a Corpus) -> Decision<'a> {
    let best = best_match(query, corpus);
    decide(query, best.as_ref())
}
