//! Core data types shared by the triage store, pipeline, and HTTP layer.

use serde::Serialize;

/// Lifecycle state of a triaged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Open,
    Resolved,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Open => "open",
            QueryStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(QueryStatus::Open),
            "resolved" => Some(QueryStatus::Resolved),
            _ => None,
        }
    }
}

/// A query that failed to match confidently and was routed to human review.
///
/// Created `open` and unpublished; an administrative resolve sets the
/// response text, flips the status, and publishes the record in one step.
/// Records are never deleted and never transition back to `open`.
#[derive(Debug, Clone, Serialize)]
pub struct TriageRecord {
    pub id: String,
    /// The query in the baseline language, as it was matched.
    pub question: String,
    /// The query exactly as the user typed it.
    pub original_question: Option<String>,
    pub detected_language: Option<String>,
    pub user_email: Option<String>,
    pub status: QueryStatus,
    pub response: Option<String>,
    pub published: bool,
    /// Epoch seconds.
    pub created_at: i64,
    pub updated_at: i64,
}
