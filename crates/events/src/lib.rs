//! Event sinks for the users service.
//!
//! Two kinds of sink receive every encoded event:
//! - an [`EventLogger`], written synchronously and durable (the replay source)
//! - a [`Publisher`], fed asynchronously through a [`PublishDispatcher`]

pub mod dispatcher;
pub mod error;
pub mod file;
pub mod log;
pub mod memory;
pub mod publisher;
pub mod redis_publisher;

pub use dispatcher::{DispatchConfig, PublishDispatcher};
pub use error::{EventLogError, PublishError, Result};
pub use file::FileEventLog;
pub use log::{EventLogger, LoggedEvent};
pub use memory::InMemoryEventLog;
pub use publisher::{BroadcastPublisher, Publisher};
pub use redis_publisher::RedisPublisher;

#[cfg(any(test, feature = "mock"))]
pub use log::MockEventLogger;
#[cfg(any(test, feature = "mock"))]
pub use publisher::MockPublisher;
