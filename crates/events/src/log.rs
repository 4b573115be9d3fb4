use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::EventId;
use domain::Event;
use serde::{Deserialize, Serialize};

use crate::Result;

/// An event as recorded by an [`EventLogger`].
///
/// `sequence` is the sink-assigned logical timestamp: it increases by one for
/// every event the sink accepts, starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub id: EventId,
    pub sequence: u64,
    pub logged_at: DateTime<Utc>,
    pub event: Event,
}

impl LoggedEvent {
    /// Stamps an event with a fresh ID and the current time.
    pub fn new(sequence: u64, event: Event) -> Self {
        Self {
            id: EventId::new(),
            sequence,
            logged_at: Utc::now(),
            event,
        }
    }
}

/// Durable, synchronous sink for events.
///
/// Events are appended in the order `log_event` calls complete. The log is
/// the source of truth for replay; publishing is best effort.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EventLogger: Send + Sync {
    /// Appends an event and returns it as recorded.
    async fn log_event(&self, event: &Event) -> Result<LoggedEvent>;
}

#[async_trait]
impl<T: EventLogger + ?Sized> EventLogger for std::sync::Arc<T> {
    async fn log_event(&self, event: &Event) -> Result<LoggedEvent> {
        (**self).log_event(event).await
    }
}
