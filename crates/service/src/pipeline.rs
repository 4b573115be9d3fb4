use std::sync::Arc;

use domain::UserRepository;
use events::{EventLogger, PublishDispatcher};

use crate::{CommandService, EventCommandService, LoggingCommandService, UserCommandService};

/// Assembles the command decorator chain.
///
/// With both decorators enabled, `build()` produces
/// `EventCommandService(LoggingCommandService(UserCommandService))`: events
/// are emitted first, then the command is logged and executed.
pub struct CommandPipeline;

impl CommandPipeline {
    pub fn builder<R>(repository: R) -> CommandPipelineBuilder<R>
    where
        R: UserRepository + 'static,
    {
        CommandPipelineBuilder {
            repository,
            logging: false,
            events: None,
        }
    }
}

pub struct CommandPipelineBuilder<R> {
    repository: R,
    logging: bool,
    events: Option<(Arc<dyn EventLogger>, Arc<PublishDispatcher>)>,
}

impl<R> CommandPipelineBuilder<R>
where
    R: UserRepository + 'static,
{
    /// Wraps the base service in a [`LoggingCommandService`].
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Wraps the stack in an [`EventCommandService`].
    pub fn with_events(
        mut self,
        event_log: impl EventLogger + 'static,
        dispatcher: Arc<PublishDispatcher>,
    ) -> Self {
        self.events = Some((Arc::new(event_log), dispatcher));
        self
    }

    pub fn build(self) -> Arc<dyn CommandService> {
        let base = UserCommandService::new(self.repository);

        match (self.logging, self.events) {
            (true, Some((event_log, dispatcher))) => Arc::new(EventCommandService::new(
                LoggingCommandService::new(base),
                event_log,
                dispatcher,
            )),
            (false, Some((event_log, dispatcher))) => {
                Arc::new(EventCommandService::new(base, event_log, dispatcher))
            }
            (true, None) => Arc::new(LoggingCommandService::new(base)),
            (false, None) => Arc::new(base),
        }
    }
}
