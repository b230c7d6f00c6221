//! SQLite implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreStats, UrlRepository};
use crate::error::AppError;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(sqlx::FromRow)]
struct UrlRow {
    code: String,
    target: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(row.code, row.target, row.clicks, row.created_at)
    }
}

/// Opens a SQLite connection pool.
///
/// The database file is created if missing and runs in WAL mode. In-memory
/// databases are private to a connection, so they get a single connection
/// that is never recycled.
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);

    let pool_options = if is_in_memory(database_url) {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// SQLite repository for short code records.
///
/// Uniqueness rests on the `UNIQUE` constraint of `urls.code` and counting on
/// a single-statement `clicks = clicks + 1` update, so no application-level
/// locking is needed.
pub struct SqliteUrlRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM urls WHERE code = ?1 LIMIT 1")
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(found.is_some())
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT code, target, clicks, created_at
            FROM urls
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert_unique(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (code, target, clicks, created_at)
            VALUES (?1, ?2, 0, ?3)
            RETURNING code, target, clicks, created_at
            "#,
        )
        .bind(&new_record.code)
        .bind(&new_record.target)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE urls SET clicks = clicks + 1 WHERE code = ?1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Shortcode not found",
                json!({ "code": code }),
            ));
        }

        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let (links, clicks) =
            sqlx::query_as::<_, (i64, i64)>("SELECT COUNT(*), COALESCE(SUM(clicks), 0) FROM urls")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(StoreStats { links, clicks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:shared?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://shortly.db"));
    }
}
