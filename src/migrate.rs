use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    // Triage queue for unanswered queries
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS queries (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            original_question TEXT,
            detected_language TEXT,
            user_email TEXT,
            status TEXT NOT NULL DEFAULT 'open',
            response TEXT,
            published INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_queries_status ON queries(status)")
        .execute(&pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_queries_created_at ON queries(created_at DESC)")
        .execute(&pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_queries_updated_at ON queries(updated_at DESC)")
        .execute(&pool)
        .await?;

    pool.close().await;
    Ok(())
}
