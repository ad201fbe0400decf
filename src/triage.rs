//! The triage sink: persistence for queries that failed to match.
//!
//! Records are appended when the matcher escalates and updated exactly
//! once by an administrative resolve. Nothing here deletes rows.
//!
//! Error contract: `resolve` fails with a "must not be empty" message for
//! blank response text and a "not found" message for unknown ids; the
//! HTTP layer classifies on those substrings. `submit` errors are the
//! caller's to swallow — the query pipeline logs and continues so a
//! storage outage never blocks the chat flow.

use anyhow::{bail, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::config::Config;
use crate::db;
use crate::models::{QueryStatus, TriageRecord};

/// Maximum records returned by [`list_published`].
pub const PUBLISHED_LIMIT: i64 = 10;

/// Fields captured when a query is escalated.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// The baseline-language query text used for matching.
    pub question: String,
    /// The query as the user originally typed it.
    pub original_question: Option<String>,
    pub detected_language: Option<String>,
    pub user_email: Option<String>,
}

fn record_from_row(row: &SqliteRow) -> TriageRecord {
    let status: String = row.get("status");
    let published: i64 = row.get("published");
    TriageRecord {
        id: row.get("id"),
        question: row.get("question"),
        original_question: row.get("original_question"),
        detected_language: row.get("detected_language"),
        user_email: row.get("user_email"),
        status: QueryStatus::parse(&status).unwrap_or(QueryStatus::Open),
        response: row.get("response"),
        published: published != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const SELECT_COLUMNS: &str = "id, question, original_question, detected_language, user_email, \
                              status, response, published, created_at, updated_at";

/// Create a triage record in `open`, unpublished state.
pub async fn submit(config: &Config, submission: Submission) -> Result<TriageRecord> {
    if submission.question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let pool = db::connect(config).await?;
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO queries (id, question, original_question, detected_language, user_email,
                             status, response, published, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 'open', NULL, 0, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&submission.question)
    .bind(&submission.original_question)
    .bind(&submission.detected_language)
    .bind(&submission.user_email)
    .bind(now)
    .bind(now)
    .execute(&pool)
    .await?;

    let record = TriageRecord {
        id,
        question: submission.question,
        original_question: submission.original_question,
        detected_language: submission.detected_language,
        user_email: submission.user_email,
        status: QueryStatus::Open,
        response: None,
        published: false,
        created_at: now,
        updated_at: now,
    };

    pool.close().await;
    Ok(record)
}

/// List triage records, optionally filtered by status, newest first.
pub async fn list(config: &Config, status: Option<QueryStatus>) -> Result<Vec<TriageRecord>> {
    let pool = db::connect(config).await?;

    let rows = match status {
        Some(status) => {
            sqlx::query(&format!(
                "SELECT {} FROM queries WHERE status = ? ORDER BY created_at DESC, id ASC",
                SELECT_COLUMNS
            ))
            .bind(status.as_str())
            .fetch_all(&pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM queries ORDER BY created_at DESC, id ASC",
                SELECT_COLUMNS
            ))
            .fetch_all(&pool)
            .await?
        }
    };

    let records = rows.iter().map(record_from_row).collect();
    pool.close().await;
    Ok(records)
}

/// Resolve a triage record: store the human-authored response, mark it
/// `resolved`, and publish it.
///
/// Re-resolving an already-resolved record overwrites the response and
/// keeps it published.
pub async fn resolve(config: &Config, id: &str, response_text: &str) -> Result<TriageRecord> {
    let response_text = response_text.trim();
    if response_text.is_empty() {
        bail!("response must not be empty");
    }

    let pool = db::connect(config).await?;
    let now = Utc::now().timestamp();

    let updated = sqlx::query(
        "UPDATE queries SET status = 'resolved', response = ?, published = 1, updated_at = ? WHERE id = ?",
    )
    .bind(response_text)
    .bind(now)
    .bind(id)
    .execute(&pool)
    .await?;

    if updated.rows_affected() == 0 {
        pool.close().await;
        bail!("query not found: {}", id);
    }

    let row = sqlx::query(&format!(
        "SELECT {} FROM queries WHERE id = ?",
        SELECT_COLUMNS
    ))
    .bind(id)
    .fetch_one(&pool)
    .await?;

    let record = record_from_row(&row);
    pool.close().await;
    Ok(record)
}

/// Published, resolved records for the "latest updates" feed,
/// newest-updated first, capped at [`PUBLISHED_LIMIT`].
pub async fn list_published(config: &Config, limit: Option<i64>) -> Result<Vec<TriageRecord>> {
    let pool = db::connect(config).await?;
    let limit = limit.unwrap_or(PUBLISHED_LIMIT);

    let rows = sqlx::query(&format!(
        "SELECT {} FROM queries WHERE published = 1 AND status = 'resolved' \
         ORDER BY updated_at DESC, id ASC LIMIT ?",
        SELECT_COLUMNS
    ))
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    let records = rows.iter().map(record_from_row).collect();
    pool.close().await;
    Ok(records)
}
