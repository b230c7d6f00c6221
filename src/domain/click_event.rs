//! Click event model for asynchronous click accounting.

use chrono::{DateTime, Utc};

/// A successful redirect waiting to be counted.
///
/// Created by [`crate::application::services::ResolveService::resolve`] and
/// handed to the background worker through a bounded channel, so the redirect
/// response never waits on the counter write. Once queued, the event no
/// longer depends on the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            occurred_at: Utc::now(),
        }
    }
}
