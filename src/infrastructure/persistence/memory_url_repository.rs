//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreStats, UrlRepository};
use crate::error::AppError;

/// Record store backed by a sharded concurrent map.
///
/// Insert-if-absent goes through the entry API and increments happen under the
/// shard write guard, so both are atomic per code without a global lock.
/// Records live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    records: DashMap<String, UrlRecord>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.records.contains_key(code))
    }

    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.records.get(code).map(|entry| entry.value().clone()))
    }

    async fn insert_unique(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        match self.records.entry(new_record.code) {
            Entry::Occupied(slot) => Err(AppError::code_conflict(
                "Shortcode already exists",
                json!({ "code": slot.key() }),
            )),
            Entry::Vacant(slot) => {
                let record = UrlRecord::new(slot.key().clone(), new_record.target, 0, Utc::now());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        match self.records.get_mut(code) {
            Some(mut record) => {
                record.clicks += 1;
                Ok(())
            }
            None => Err(AppError::not_found(
                "Shortcode not found",
                json!({ "code": code }),
            )),
        }
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let stats = self
            .records
            .iter()
            .fold(StoreStats::default(), |mut acc, entry| {
                acc.links += 1;
                acc.clicks += entry.clicks;
                acc
            });

        Ok(stats)
    }
}
