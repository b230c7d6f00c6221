//! Short code resolution service.

use std::sync::Arc;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::ClickSender;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use serde_json::json;

/// Service for resolving short codes and inspecting records.
pub struct ResolveService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    clicks: ClickSender,
}

impl<R: UrlRepository + ?Sized> ResolveService<R> {
    /// Creates a new resolution service.
    pub fn new(repository: Arc<R>, clicks: ClickSender) -> Self {
        Self { repository, clicks }
    }

    /// Returns the target URL for `code` and schedules a click increment.
    ///
    /// The increment is queued with [`ClickSender::submit`], which never
    /// waits. Its outcome, including a dropped event, is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the code; nothing
    /// is queued in that case.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let record = self.find(code).await?;

        self.clicks.submit(ClickEvent::new(code));

        Ok(record.target)
    }

    /// Returns the full record for `code` without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the code.
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn info(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.find(code).await
    }

    async fn find(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .get(code)
            .await?
            .ok_or_else(|| AppError::not_found("Shortcode not found", json!({ "code": code })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::click_worker::click_channel;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;

    fn create_test_record(code: &str, target: &str, clicks: i64) -> UrlRecord {
        UrlRecord::new(code.to_string(), target.to_string(), clicks, Utc::now())
    }

    #[tokio::test]
    async fn test_resolve_returns_target_and_queues_click() {
        let mut mock_repo = MockUrlRepository::new();

        let record = create_test_record("abc123", "http://example.com", 0);
        mock_repo
            .expect_get()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo.expect_increment_clicks().times(0);

        let (sender, mut rx) = click_channel(8);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let target = service.resolve("abc123").await.unwrap();

        assert_eq!(target, "http://example.com");
        let event = rx.try_recv().unwrap();
        assert_eq!(event.code, "abc123");
    }

    #[tokio::test]
    async fn test_resolve_not_found_queues_nothing() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo.expect_get().times(1).returning(|_| Ok(None));
        mock_repo.expect_insert_unique().times(0);
        mock_repo.expect_increment_clicks().times(0);

        let (sender, mut rx) = click_channel(8);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let result = service.resolve("nothere").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_click_queue_closed() {
        let mut mock_repo = MockUrlRepository::new();

        let record = create_test_record("abc123", "https://example.com/target", 0);
        mock_repo
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));

        let (sender, rx) = click_channel(8);
        drop(rx);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let target = service.resolve("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_failure() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_get()
            .times(1)
            .returning(|_| Err(AppError::storage("Database error", json!({}))));

        let (sender, mut rx) = click_channel(8);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let result = service.resolve("abc123").await;

        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_info_has_no_side_effects() {
        let mut mock_repo = MockUrlRepository::new();

        let record = create_test_record("abc123", "https://example.com", 7);
        mock_repo
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        mock_repo.expect_increment_clicks().times(0);

        let (sender, mut rx) = click_channel(8);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let info = service.info("abc123").await.unwrap();

        assert_eq!(info.code, "abc123");
        assert_eq!(info.clicks, 7);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_info_not_found() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_get().times(1).returning(|_| Ok(None));

        let (sender, _rx) = click_channel(8);
        let service = ResolveService::new(Arc::new(mock_repo), sender);

        let result = service.info("missing").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
