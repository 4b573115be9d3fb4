//! Decorator that turns every command into an event.
//!
//! For each command the event is encoded, written to the event log and
//! queued for publishing, in that order, and only then is the inner service
//! called. Events are therefore emitted for commands the inner service later
//! rejects. Neither the log write nor the publish can change the command's
//! result.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    AddUserCommand, Command, DeleteUserCommand, DomainResult, ModifyUserCommand, User,
};
use events::{EventLogger, PublishDispatcher};

use crate::CommandService;

pub struct EventCommandService<S, L> {
    inner: S,
    event_log: L,
    dispatcher: Arc<PublishDispatcher>,
}

impl<S, L> EventCommandService<S, L>
where
    S: CommandService,
    L: EventLogger,
{
    pub fn new(inner: S, event_log: L, dispatcher: Arc<PublishDispatcher>) -> Self {
        Self {
            inner,
            event_log,
            dispatcher,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn emit<C: Command>(&self, command: &C) {
        let event = match command.encode_event() {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(command = C::NAME, error = %e, "failed to encode event");
                return;
            }
        };

        match self.event_log.log_event(&event).await {
            Ok(logged) => {
                metrics::counter!("events_logged_total").increment(1);
                tracing::debug!(kind = %event.kind(), sequence = logged.sequence, "event logged");
            }
            Err(e) => {
                metrics::counter!("event_log_failures_total").increment(1);
                tracing::error!(kind = %event.kind(), error = %e, "failed to log event");
            }
        }

        self.dispatcher.submit(event);
    }
}

#[async_trait]
impl<S, L> CommandService for EventCommandService<S, L>
where
    S: CommandService,
    L: EventLogger,
{
    async fn add_user(&self, command: AddUserCommand) -> DomainResult<User> {
        self.emit(&command).await;
        self.inner.add_user(command).await
    }

    async fn modify_user(&self, command: ModifyUserCommand) -> DomainResult<()> {
        self.emit(&command).await;
        self.inner.modify_user(command).await
    }

    async fn delete_user(&self, command: DeleteUserCommand) -> DomainResult<()> {
        self.emit(&command).await;
        self.inner.delete_user(command).await
    }
}
