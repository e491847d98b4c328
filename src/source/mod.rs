pub mod local_store;

pub use local_store::LocalStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::calendar::{DateWindow, EventRecord};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Calendar access denied")]
    AccessDenied,
    #[error("Calendar access failed: {0}")]
    Access(String),
    #[error("Failed to read calendar store: {0}")]
    Store(#[from] std::io::Error),
    #[error("Failed to parse calendar store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only boundary to the system of record for events.
///
/// `request_access` is the run's single asynchronous suspension point: the
/// orchestrator awaits it exactly once and only issues the query after it
/// resolves. There is no retry on either operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarSource {
    /// One-shot, user-mediated authorization request.
    async fn request_access(&self) -> Result<(), SourceError>;

    /// All events overlapping `window` across every visible calendar, in
    /// source iteration order. Zero matches is an empty list, not an error.
    async fn events_in(&self, window: DateWindow) -> Result<Vec<EventRecord>, SourceError>;
}
