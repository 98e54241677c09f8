use std::{path::Path, str::FromStr};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::debug;

use super::{schema, NewPrompt, Prompt, PromptId, PromptStore};
use crate::errors::{PromptError, Result};

const SELECT_COLUMNS: &str = "id, name, description, content, created_at, updated_at";

/// SQLite-backed prompt store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the schema
    pub async fn open(path: &Path) -> Result<Self> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PromptError::Store(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        debug!(path = %path.display(), "opened sqlite prompt store");
        Self::with_pool(pool).await
    }

    /// Private in-memory database, gone once the store is dropped
    pub async fn in_memory() -> Result<Self> {
        // Every connection to :memory: is its own database, so pin the pool
        // to a single connection that never expires.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        // Split by semicolon to run multiple statements
        for statement in schema::SCHEMA.split(';') {
            if statement.trim().is_empty() {
                continue;
            }
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl PromptStore for SqliteStore {
    async fn find_all(&self) -> Result<Vec<Prompt>> {
        let prompts = sqlx::query_as::<_, Prompt>(&format!(
            "SELECT {} FROM prompts ORDER BY id ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(prompts)
    }

    async fn insert(&self, draft: &NewPrompt) -> Result<Prompt> {
        let now = Utc::now().timestamp();

        let prompt = sqlx::query_as::<_, Prompt>(&format!(
            "INSERT INTO prompts (name, description, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(prompt)
    }

    async fn update_by_id(&self, id: PromptId, fields: &NewPrompt) -> Result<Option<Prompt>> {
        let now = Utc::now().timestamp();

        let prompt = sqlx::query_as::<_, Prompt>(&format!(
            "UPDATE prompts SET name = ?, description = ?, content = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(prompt)
    }

    async fn delete_by_id(&self, id: PromptId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
