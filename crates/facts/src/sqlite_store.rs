//! SQLite-backed [`FactStore`] implementation.
//!
//! Each trait method is a single SQL statement against the `facts` table
//! created by [`migrate`](crate::migrate). Ids are stored as hyphenated
//! UUID text and timestamps as Unix milliseconds.
//!
//! Case-insensitive matching runs against the `title_folded` column, which
//! holds [`fold_title`] of the title, so non-ASCII titles fold the same way
//! they do in the in-memory store.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use facts_core::models::{fold_title, now_millis, Fact, FactInput};
use facts_core::store::FactStore;

const FACT_COLUMNS: &str = "id, title, body, tag, source_url, created_at, updated_at";

/// SQLite implementation of the [`FactStore`] trait.
pub struct SqliteFactStore {
    pool: SqlitePool,
}

impl SqliteFactStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` wildcards so user input matches literally under
/// `ESCAPE '\'`.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| anyhow!("timestamp out of range: {}", ms))
}

fn row_to_fact(row: &SqliteRow) -> Result<Fact> {
    let id: String = row.try_get("id")?;
    Ok(Fact {
        id: Uuid::parse_str(&id).map_err(|e| anyhow!("corrupt fact id '{}': {}", id, e))?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        tag: row.try_get("tag")?,
        source_url: row.try_get("source_url")?,
        created_at: millis_to_datetime(row.try_get("created_at")?)?,
        updated_at: millis_to_datetime(row.try_get("updated_at")?)?,
    })
}

fn rows_to_facts(rows: &[SqliteRow]) -> Result<Vec<Fact>> {
    rows.iter().map(row_to_fact).collect()
}

#[async_trait]
impl FactStore for SqliteFactStore {
    async fn list_facts(&self) -> Result<Vec<Fact>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM facts ORDER BY created_at ASC, rowid ASC",
            FACT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows_to_facts(&rows)
    }

    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>> {
        let row = sqlx::query(&format!("SELECT {} FROM facts WHERE id = ?", FACT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_fact).transpose()
    }

    async fn search_by_title(&self, query: &str) -> Result<Vec<Fact>> {
        let pattern = format!("%{}%", escape_like(&fold_title(query)));
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM facts
            WHERE title_folded LIKE ? ESCAPE '\'
            ORDER BY created_at ASC, rowid ASC
            "#,
            FACT_COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        rows_to_facts(&rows)
    }

    async fn autocomplete_titles(
        &self,
        partial: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<String>> {
        let pattern = format!("{}%", escape_like(&fold_title(partial)));
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT title
            FROM facts
            WHERE title_folded LIKE ? ESCAPE '\'
            GROUP BY title
            ORDER BY MIN(created_at) ASC, MIN(rowid) ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(pattern)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("title").map_err(anyhow::Error::from))
            .collect()
    }

    async fn find_by_title_ignore_case(&self, title: &str) -> Result<Option<Fact>> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM facts
            WHERE title_folded = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
            FACT_COLUMNS
        ))
        .bind(fold_title(title))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_fact).transpose()
    }

    async fn random_fact(&self) -> Result<Option<Fact>> {
        // Full scan; cost grows with table size.
        let row = sqlx::query(&format!(
            "SELECT {} FROM facts ORDER BY RANDOM() LIMIT 1",
            FACT_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_fact).transpose()
    }

    async fn insert_fact(&self, input: &FactInput) -> Result<Fact> {
        let fact = Fact::create(input, now_millis());

        sqlx::query(
            r#"
            INSERT INTO facts (id, title, title_folded, body, tag, source_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(fact.id.to_string())
        .bind(&fact.title)
        .bind(fold_title(&fact.title))
        .bind(&fact.body)
        .bind(&fact.tag)
        .bind(&fact.source_url)
        .bind(fact.created_at.timestamp_millis())
        .bind(fact.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(fact)
    }

    async fn update_fact(&self, id: Uuid, input: &FactInput) -> Result<Option<Fact>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE facts
            SET title = ?, title_folded = ?, body = ?, tag = ?, source_url = ?,
                updated_at = MAX(updated_at, ?)
            WHERE id = ?
            RETURNING {}
            "#,
            FACT_COLUMNS
        ))
        .bind(&input.title)
        .bind(fold_title(&input.title))
        .bind(&input.body)
        .bind(&input.tag)
        .bind(&input.source_url)
        .bind(now_millis().timestamp_millis())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_fact).transpose()
    }

    async fn delete_fact(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM facts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_facts(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM facts")
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count)?)
    }
}
