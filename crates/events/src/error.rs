use thiserror::Error;

/// Errors that can occur when writing to an event log.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// The log's backing file could not be opened or written.
    #[error("Event log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The event could not be serialized, or a stored line could not be read back.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur when publishing an event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The Redis connection or command failed.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The event could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The publisher has no way to deliver events anymore.
    #[error("Publisher closed")]
    Closed,

    /// The publisher panicked while delivering the event.
    #[error("Publisher panicked")]
    Panicked,

    /// Publishing did not complete within the configured deadline.
    #[error("Publish timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Result type for event log operations.
pub type Result<T> = std::result::Result<T, EventLogError>;
