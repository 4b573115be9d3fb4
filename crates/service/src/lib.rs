//! Application services for the users service.
//!
//! Queries go straight to the repository through [`UserQueryService`].
//! Commands go through [`CommandService`], whose base implementation can be
//! wrapped by decorators:
//! - [`LoggingCommandService`] logs each command and its failure
//! - [`EventCommandService`] logs an event durably and queues it for publishing
//!
//! [`CommandPipeline`] assembles the usual stack.

pub mod command;
pub mod eventing;
pub mod logging;
pub mod pipeline;
pub mod query;

pub use command::{CommandService, UserCommandService};
pub use eventing::EventCommandService;
pub use logging::LoggingCommandService;
pub use pipeline::{CommandPipeline, CommandPipelineBuilder};
pub use query::{QueryService, UserQueryService};

#[cfg(test)]
pub use command::MockCommandService;
