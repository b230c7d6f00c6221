//! Repository trait for the short code record store.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Aggregate totals over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub links: i64,
    pub clicks: i64,
}

/// Durable mapping of short code to [`UrlRecord`].
///
/// The store is the only shared mutable resource in the service and the sole
/// source of truth for code uniqueness. Implementations must guarantee:
///
/// - [`insert_unique`](Self::insert_unique) is atomic with respect to the
///   uniqueness constraint: two concurrent inserts of the same code yield
///   exactly one success and one [`AppError::CodeConflict`].
/// - [`increment_clicks`](Self::increment_clicks) is atomic: N concurrent
///   increments on one code raise its count by exactly N.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - Sharded in-memory map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Checks whether a code is already assigned.
    ///
    /// This is an optimization for callers that want to skip doomed inserts;
    /// it is never sufficient on its own to guarantee uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Finds a record by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Inserts a new record with `clicks = 0` and the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if the code is already assigned.
    /// Returns [`AppError::Storage`] on database errors.
    async fn insert_unique(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Atomically adds one to the record's click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `code`.
    /// Returns [`AppError::Storage`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Returns the number of records and the sum of their click counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn stats(&self) -> Result<StoreStats, AppError>;
}
