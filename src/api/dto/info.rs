//! DTOs for record inspection endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlRecord;

/// Stored record as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for InfoResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            code: record.code,
            url: record.target,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}
