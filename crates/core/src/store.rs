//! Durable resume corpus backed by a single SQLite table.
//!
//! Two independent duplicate policies live here:
//! - skip-on-identical-content: [`ResumeStore::insert_if_absent`] refuses a
//!   row whose `(name, text)` pair is already stored.
//! - retain-earliest-by-id: [`ResumeStore::collapse_duplicates`] keeps the
//!   lowest `id` per name regardless of content.

use crate::error::StoreError;
use crate::models::{ResumeListing, ResumeRecord};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    SkippedIdentical,
}

pub struct ResumeStore {
    pool: SqlitePool,
}

impl ResumeStore {
    /// Opens (creating if needed) the store file and ensures the schema exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(path = %path.display(), "resume store opened");
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                file BLOB NOT NULL,
                upload_date TIMESTAMP NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resumes_name ON resumes(name);")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Appends a new version of `name`. Names are not unique at this layer.
    pub async fn insert(&self, name: &str, text: &str, content: &[u8]) -> Result<i64, StoreError> {
        let id = sqlx::query(
            "INSERT INTO resumes (name, text, file, upload_date) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(text)
        .bind(content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn contains_identical(&self, name: &str, text: &str) -> Result<bool, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE name = ? AND text = ?")
                .bind(name)
                .bind(text)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn insert_if_absent(
        &self,
        name: &str,
        text: &str,
        content: &[u8],
    ) -> Result<InsertOutcome, StoreError> {
        if self.contains_identical(name, text).await? {
            return Ok(InsertOutcome::SkippedIdentical);
        }

        let id = self.insert(name, text, content).await?;
        Ok(InsertOutcome::Inserted(id))
    }

    /// Distinct `(name, upload date)` pairs in insertion order.
    pub async fn list(&self) -> Result<Vec<ResumeListing>, StoreError> {
        let listings = sqlx::query_as::<_, ResumeListing>(
            r#"
            SELECT name, upload_date AS uploaded_at
            FROM resumes
            GROUP BY name, upload_date
            ORDER BY MIN(id)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Every stored name once, ordered by its first insertion.
    pub async fn distinct_names(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM resumes GROUP BY name ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    pub async fn latest(&self, name: &str) -> Result<Option<ResumeRecord>, StoreError> {
        let record = sqlx::query_as::<_, ResumeRecord>(
            r#"
            SELECT id, name, text, file AS content, upload_date AS uploaded_at
            FROM resumes
            WHERE name = ?
            ORDER BY upload_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn latest_text(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.latest(name).await?.map(|record| record.text))
    }

    pub async fn latest_content(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.latest(name).await?.map(|record| record.content))
    }

    /// Removes every version of `name`. Unknown names remove nothing.
    pub async fn delete(&self, name: &str) -> Result<u64, StoreError> {
        let removed = sqlx::query("DELETE FROM resumes WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!(name, removed, "deleted resume");
        Ok(removed)
    }

    pub async fn collapse_duplicates(&self) -> Result<u64, StoreError> {
        let removed = sqlx::query(
            "DELETE FROM resumes WHERE id NOT IN (SELECT MIN(id) FROM resumes GROUP BY name)",
        )
        .execute(&self.pool)
        .await?
        .rows_affected();

        info!(removed, "collapsed duplicate resumes");
        Ok(removed)
    }

    pub async fn wipe(&self) -> Result<u64, StoreError> {
        let removed = sqlx::query("DELETE FROM resumes")
            .execute(&self.pool)
            .await?
            .rows_affected();

        info!(removed, "wiped resume store");
        Ok(removed)
    }

    /// Underlying pool, for statements the store does not wrap.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resumes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
