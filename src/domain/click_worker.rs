//! Fire-and-forget click accounting.
//!
//! Redirects submit a [`ClickEvent`] through a [`ClickSender`]; a single
//! background task ([`run_click_worker`]) applies the increments to the store.
//!
//! Click counts are best-effort telemetry:
//!
//! - Submission never blocks and never fails the redirect. A full queue drops
//!   the event, a closed queue drops it too; both are logged.
//! - Each event gets at most one `increment_clicks` attempt. Failures are
//!   logged and the event is discarded.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;

/// Sending half of the click queue.
#[derive(Debug, Clone)]
pub struct ClickSender {
    tx: mpsc::Sender<ClickEvent>,
}

/// Creates a bounded click queue.
pub fn click_channel(capacity: usize) -> (ClickSender, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ClickSender { tx }, rx)
}

impl ClickSender {
    /// Queues a click without waiting.
    ///
    /// Returns `true` if the event was queued. A `false` result has already
    /// been logged; callers are not expected to act on it.
    pub fn submit(&self, event: ClickEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(code = %event.code, "Click queue full, dropping click");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                error!(code = %event.code, "Click queue closed, dropping click");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Remaining free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

/// Applies one click to the store. Returns `true` on success.
pub async fn apply_click<R>(repository: &R, event: &ClickEvent) -> bool
where
    R: UrlRepository + ?Sized,
{
    let queued_ms = (Utc::now() - event.occurred_at).num_milliseconds();

    match repository.increment_clicks(&event.code).await {
        Ok(()) => {
            debug!(code = %event.code, queued_ms, "Click recorded");
            true
        }
        Err(e) => {
            warn!(code = %event.code, queued_ms, error = %e, "Failed to record click, dropping");
            false
        }
    }
}

/// Consumes click events until every [`ClickSender`] is dropped.
///
/// Up to `concurrency` increments run at once. In-flight increments are
/// drained before the worker returns.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: UrlRepository + ?Sized + 'static,
{
    let limiter = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            apply_click(repository.as_ref(), &event).await
        });

        // reap finished tasks so the set does not grow unbounded
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::error::AppError;
    use serde_json::json;

    #[test]
    fn test_submit_queues_event() {
        let (sender, mut rx) = click_channel(4);

        assert!(sender.submit(ClickEvent::new("abc123")));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.code, "abc123");
    }

    #[test]
    fn test_submit_drops_when_full() {
        let (sender, _rx) = click_channel(1);

        assert!(sender.submit(ClickEvent::new("first")));
        assert!(!sender.submit(ClickEvent::new("second")));
    }

    #[test]
    fn test_submit_drops_when_closed() {
        let (sender, rx) = click_channel(4);
        drop(rx);

        assert!(sender.is_closed());
        assert!(!sender.submit(ClickEvent::new("abc123")));
    }

    #[tokio::test]
    async fn test_apply_click_swallows_failure() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Err(AppError::storage("Database error", json!({}))));

        assert!(!apply_click(&mock_repo, &ClickEvent::new("abc123")).await);
    }

    #[tokio::test]
    async fn test_worker_applies_each_event_once() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_increment_clicks()
            .withf(|code| code == "abc123")
            .times(3)
            .returning(|_| Ok(()));

        let (sender, rx) = click_channel(16);
        for _ in 0..3 {
            sender.submit(ClickEvent::new("abc123"));
        }
        drop(sender);

        run_click_worker(rx, Arc::new(mock_repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_does_not_retry_failed_increment() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_increment_clicks()
            .times(1)
            .returning(|code| Err(AppError::not_found("Shortcode not found", json!({ "code": code }))));

        let (sender, rx) = click_channel(16);
        sender.submit(ClickEvent::new("gone"));
        drop(sender);

        run_click_worker(rx, Arc::new(mock_repo), 1).await;
    }
}
