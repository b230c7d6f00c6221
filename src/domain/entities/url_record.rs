//! URL record entity: a short code mapped to its target URL.

use chrono::{DateTime, Utc};

/// A short code and the URL it redirects to.
///
/// `code` and `target` are fixed at creation. `clicks` only grows, and only
/// through [`crate::domain::repositories::UrlRepository::increment_clicks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub code: String,
    pub target: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(code: String, target: String, clicks: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            target,
            clicks,
            created_at,
        }
    }
}

/// Input data for allocating a new record.
///
/// The click counter starts at zero and the creation timestamp is assigned by
/// the store at insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub code: String,
    pub target: String,
}

impl NewUrlRecord {
    pub fn new(code: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target: target.into(),
        }
    }
}
