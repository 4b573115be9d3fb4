use std::sync::Arc;

use async_trait::async_trait;
use domain::Event;
use tokio::sync::RwLock;

use crate::{EventLogger, LoggedEvent, Result};

/// In-memory event log implementation for testing.
///
/// Clones share the same underlying log, so a test can keep one handle while
/// the service owns another.
#[derive(Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<RwLock<Vec<LoggedEvent>>>,
}

impl InMemoryEventLog {
    /// Creates a new empty in-memory event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every logged event, oldest first.
    pub async fn events(&self) -> Vec<LoggedEvent> {
        self.events.read().await.clone()
    }

    /// Returns the total number of events logged.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Clears all events.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl EventLogger for InMemoryEventLog {
    async fn log_event(&self, event: &Event) -> Result<LoggedEvent> {
        let mut log = self.events.write().await;

        let logged = LoggedEvent::new(log.len() as u64 + 1, event.clone());
        log.push(logged.clone());

        Ok(logged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use domain::{Command, DeleteUserCommand, EventKind};

    fn event() -> Event {
        DeleteUserCommand::new(UserId::new()).encode_event().unwrap()
    }

    #[tokio::test]
    async fn test_sequences_start_at_one_and_increase() {
        let log = InMemoryEventLog::new();

        let first = log.log_event(&event()).await.unwrap();
        let second = log.log_event(&event()).await.unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert!(second.logged_at >= first.logged_at);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_clones_share_the_log() {
        let log = InMemoryEventLog::new();
        let handle = log.clone();

        log.log_event(&event()).await.unwrap();

        assert_eq!(handle.len().await, 1);
        assert_eq!(handle.events().await[0].event.kind(), EventKind::UserDeleted);

        handle.clear().await;
        assert!(log.is_empty().await);
    }
}
