use std::sync::Arc;

use async_trait::async_trait;
use domain::Event;
use tokio::sync::broadcast;

use crate::PublishError;

/// Best-effort, fire-and-forget delivery of events to external subscribers.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Delivers an event to whoever is listening.
    async fn publish_event(&self, event: &Event) -> Result<(), PublishError>;
}

#[async_trait]
impl<T: Publisher + ?Sized> Publisher for Arc<T> {
    async fn publish_event(&self, event: &Event) -> Result<(), PublishError> {
        (**self).publish_event(event).await
    }
}

/// In-process publisher backed by a tokio broadcast channel.
///
/// Stands in for Redis in development and tests. Publishing with no live
/// subscribers is not an error; the event is simply dropped.
#[derive(Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<Event>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver that sees every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl Publisher for BroadcastPublisher {
    async fn publish_event(&self, event: &Event) -> Result<(), PublishError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => {
                tracing::debug!(kind = %event.kind(), receivers, "event broadcast");
            }
            Err(_) => {
                tracing::debug!(kind = %event.kind(), "event broadcast with no subscribers");
            }
        }
        Ok(())
    }
}
