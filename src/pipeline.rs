//! The query pipeline: detect → translate to baseline → match → decide →
//! persist on escalation → translate the answer back.
//!
//! Steps are strictly sequential; each depends on the previous one's
//! output. The only fallible step that is allowed to surface an error is
//! input validation — translation degrades silently and a failed triage
//! write is logged while the user still receives the deferred-response
//! message.

use anyhow::{bail, Result};

use crate::bridge::LanguageBridge;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::lang::{self, BASELINE_LANG};
use crate::matcher::{self, Decision};
use crate::triage::{self, Submission};

/// Message returned in place of an answer when a query is escalated.
pub const DEFERRED_RESPONSE: &str =
    "Your query has been sent to the admin team. You'll be notified once it's resolved.";

/// Everything the caller needs to render a chat reply.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Answer in the user's language (possibly degraded to English).
    pub answer: String,
    /// Answer in the baseline language, before back-translation.
    pub original_answer: String,
    /// Canonical question of the matched corpus entry, if any.
    pub matched_question: Option<String>,
    /// Language answers were rendered in.
    pub language: String,
    /// Language the query was detected (or hinted) as.
    pub detected_language: String,
    /// Whether back-translation applied (user language differs from baseline).
    pub translated: bool,
    /// True when the query was routed to triage instead of answered.
    pub escalated: bool,
    /// True when a provider degrade left the answer untranslated.
    pub used_fallback: bool,
}

/// Run one query through the whole pipeline.
///
/// Fails only for blank input or an unknown language hint. Matching
/// happens on the baseline-language
/// form of the query; the chosen answer (or the deferred-response
/// message) is translated back into the user's language at the end.
pub async fn answer_query(
    config: &Config,
    corpus: &Corpus,
    bridge: &LanguageBridge,
    query: &str,
    language_hint: Option<&str>,
    user_email: Option<&str>,
) -> Result<QueryOutcome> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }
    if let Some(hint) = language_hint {
        if !lang::is_supported(hint) {
            bail!("invalid language code: {}", hint);
        }
    }

    let processed = bridge.process_user_query(query, language_hint).await;
    println!(
        "Processing query: {:?} ({}) -> {:?} ({})",
        processed.original_query, processed.detected_lang, processed.translated_query, BASELINE_LANG
    );

    let decision = matcher::match_query(&processed.translated_query, corpus);

    let (answer, matched_question, escalated) = match decision {
        Decision::Answer { entry, .. } => (entry.answer.clone(), Some(entry.question.clone()), false),
        Decision::Escalate => {
            let submission = Submission {
                question: processed.translated_query.clone(),
                original_question: Some(processed.original_query.clone()),
                detected_language: Some(processed.detected_lang.clone()),
                user_email: user_email.map(str::to_string),
            };
            if let Err(e) = triage::submit(config, submission).await {
                eprintln!("Warning: failed to save query to the triage queue: {}", e);
            }
            (DEFERRED_RESPONSE.to_string(), None, true)
        }
    };

    let translation = bridge.translate_response(&answer, &processed.user_lang).await;
    let used_fallback = translation.used_fallback();

    Ok(QueryOutcome {
        answer: translation.text,
        original_answer: answer,
        matched_question,
        language: processed.user_lang.clone(),
        detected_language: processed.detected_lang,
        translated: processed.user_lang != BASELINE_LANG,
        escalated,
        used_fallback,
    })
}
