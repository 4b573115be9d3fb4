//! Background delivery of events to a [`Publisher`].
//!
//! The command path must never wait on the message broker, so events are
//! handed to a bounded queue and a single worker task publishes them. A full
//! queue drops the event instead of applying backpressure; the durable event
//! log remains the source of truth.

use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use domain::Event;
use futures_util::FutureExt;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::{PublishError, Publisher};

/// Default number of events that may wait for publishing.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default deadline for a single publish.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum number of queued events; must be at least 1.
    pub capacity: usize,
    pub publish_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }
}

/// Bounded queue plus the worker task draining it.
pub struct PublishDispatcher {
    sender: mpsc::Sender<Event>,
    cancel: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PublishDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn<P>(publisher: P, config: DispatchConfig) -> Self
    where
        P: Publisher + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1));
        let (cancel, cancelled) = watch::channel(false);

        let worker = tokio::spawn(run_worker(
            publisher,
            receiver,
            cancelled,
            config.publish_timeout,
        ));

        Self {
            sender,
            cancel,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queues an event for publishing without waiting.
    ///
    /// Returns `false` if the event was dropped because the queue is full or
    /// the dispatcher has shut down.
    pub fn submit(&self, event: Event) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                metrics::counter!("events_dropped_total", "reason" => "queue_full").increment(1);
                tracing::warn!(kind = %event.kind(), "publish queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                metrics::counter!("events_dropped_total", "reason" => "closed").increment(1);
                tracing::warn!(kind = %event.kind(), "dispatcher shut down, dropping event");
                false
            }
        }
    }

    /// Stops accepting events, publishes everything already queued, and waits
    /// for the worker to exit. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.cancel.send_replace(true);

        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "publish worker failed");
            }
            tracing::info!("publish dispatcher stopped");
        }
    }
}

async fn run_worker<P: Publisher>(
    publisher: P,
    mut receiver: mpsc::Receiver<Event>,
    mut cancelled: watch::Receiver<bool>,
    publish_timeout: Duration,
) {
    let mut closing = false;

    loop {
        tokio::select! {
            biased;

            _ = cancelled.changed(), if !closing => {
                // Refuse new events; already queued ones are still delivered.
                closing = true;
                receiver.close();
                tracing::debug!(queued = receiver.len(), "draining publish queue");
            }

            next = receiver.recv() => match next {
                Some(event) => publish_one(&publisher, &event, publish_timeout).await,
                None => break,
            },
        }
    }
}

async fn publish_one<P: Publisher>(publisher: &P, event: &Event, publish_timeout: Duration) {
    let start = Instant::now();

    // A panicking publisher must not take the worker down with it.
    let publish = AssertUnwindSafe(publisher.publish_event(event)).catch_unwind();
    let result = match tokio::time::timeout(publish_timeout, publish).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(PublishError::Panicked),
        Err(_) => Err(PublishError::Timeout(publish_timeout)),
    };

    metrics::histogram!("event_publish_duration_seconds").record(start.elapsed().as_secs_f64());

    match result {
        Ok(()) => {
            metrics::counter!("events_published_total").increment(1);
        }
        Err(e) => {
            let reason = match e {
                PublishError::Timeout(_) => "timeout",
                PublishError::Panicked => "panic",
                _ => "error",
            };
            metrics::counter!("event_publish_failures_total", "reason" => reason).increment(1);
            tracing::error!(kind = %event.kind(), error = %e, "failed to publish event");
        }
    }
}
