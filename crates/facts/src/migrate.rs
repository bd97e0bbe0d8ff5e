//! Database schema migrations.
//!
//! Creates the `facts` table and its indexes. Every statement is
//! idempotent, so `facts init` can be run repeatedly and `facts serve`
//! applies the schema on startup.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use tracing::info;

use facts_core::models::fold_title;

use crate::config::Config;
use crate::db;

/// Connects to the configured database, applies the schema, and closes
/// the pool. Used by `facts init`.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = apply(&pool).await;
    pool.close().await;
    result
}

/// Applies the schema to an open pool.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // Timestamps are Unix milliseconds. Length bounds on title, tag and
    // source_url are checked before rows reach the table. title_folded
    // holds fold_title(title); SQLite's own case folding is ASCII-only.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS facts (
            id TEXT PRIMARY KEY CHECK (length(id) = 36),
            title TEXT NOT NULL,
            title_folded TEXT NOT NULL,
            body TEXT NOT NULL,
            tag TEXT NOT NULL,
            source_url TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            CHECK (updated_at >= created_at)
        )
        "#,
    )
    .execute(pool)
    .await?;

    add_title_folded(pool).await?;

    sqlx::query("DROP INDEX IF EXISTS idx_facts_title_nocase")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_facts_title_folded ON facts(title_folded)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_facts_created_at ON facts(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Adds and backfills `title_folded` on databases created before the
/// column existed. No-op otherwise.
async fn add_title_folded(pool: &SqlitePool) -> Result<()> {
    let present: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('facts') WHERE name = 'title_folded'",
    )
    .fetch_one(pool)
    .await?;
    if present > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    sqlx::query("ALTER TABLE facts ADD COLUMN title_folded TEXT NOT NULL DEFAULT ''")
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("SELECT id, title FROM facts")
        .fetch_all(&mut *tx)
        .await?;
    for row in &rows {
        let id: String = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        sqlx::query("UPDATE facts SET title_folded = ? WHERE id = ?")
            .bind(fold_title(&title))
            .bind(&id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(rows = rows.len(), "backfilled facts.title_folded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_pool() -> (TempDir, SqlitePool) {
        let tmp = TempDir::new().unwrap();
        let config = Config::with_db_path(tmp.path().join("facts.sqlite"));
        let pool = db::connect(&config).await.unwrap();
        (tmp, pool)
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let (_tmp, pool) = open_pool().await;
        apply(&pool).await.unwrap();
        apply(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM facts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        pool.close().await;
    }

    #[tokio::test]
    async fn test_apply_backfills_title_folded_on_older_schema() {
        let (_tmp, pool) = open_pool().await;
        sqlx::query(
            r#"
            CREATE TABLE facts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                tag TEXT NOT NULL,
                source_url TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO facts VALUES ('00000000-0000-4000-8000-000000000001', 'Éclair Origins', 'b', 't', NULL, 1, 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        apply(&pool).await.unwrap();

        let folded: String = sqlx::query_scalar("SELECT title_folded FROM facts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(folded, "éclair origins");

        pool.close().await;
    }
}
