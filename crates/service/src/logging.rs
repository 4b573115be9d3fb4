use async_trait::async_trait;
use domain::{
    AddUserCommand, Command, DeleteUserCommand, DomainResult, ModifyUserCommand, User,
};

use crate::CommandService;

/// Decorator that logs every command before handing it to the inner service.
///
/// Emits `"<Name> command received"` at info level with the command payload
/// (passwords are redacted by their `Debug` impl), and `"<Name> command
/// failed"` at error level when the inner service fails. Results are passed
/// through untouched.
pub struct LoggingCommandService<S> {
    inner: S,
}

impl<S: CommandService> LoggingCommandService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn received<C: Command>(command: &C) {
    tracing::info!(command = ?command, "{} command received", C::NAME);
}

fn finished<C: Command, T>(result: &DomainResult<T>) {
    match result {
        Ok(_) => {
            metrics::counter!("commands_total", "command" => C::NAME, "outcome" => "success")
                .increment(1);
        }
        Err(e) => {
            metrics::counter!("commands_total", "command" => C::NAME, "outcome" => "failure")
                .increment(1);
            tracing::error!(error = %e, "{} command failed", C::NAME);
        }
    }
}

#[async_trait]
impl<S: CommandService> CommandService for LoggingCommandService<S> {
    async fn add_user(&self, command: AddUserCommand) -> DomainResult<User> {
        received(&command);
        let result = self.inner.add_user(command).await;
        finished::<AddUserCommand, _>(&result);
        result
    }

    async fn modify_user(&self, command: ModifyUserCommand) -> DomainResult<()> {
        received(&command);
        let result = self.inner.modify_user(command).await;
        finished::<ModifyUserCommand, _>(&result);
        result
    }

    async fn delete_user(&self, command: DeleteUserCommand) -> DomainResult<()> {
        received(&command);
        let result = self.inner.delete_user(command).await;
        finished::<DeleteUserCommand, _>(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockCommandService;
    use common::UserId;
    use domain::{DomainError, Password};
    use tracing_test::traced_test;

    fn add_command() -> AddUserCommand {
        AddUserCommand {
            first_name: "John".into(),
            email: "john@doe.com".into(),
            password: Password::new("hunter2"),
            ..Default::default()
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn test_logs_received_and_passes_result_through() {
        let user = User::new("John", "", "", &Password::new("pw"), "john@doe.com", "").unwrap();
        let expected = user.clone();

        let mut inner = MockCommandService::new();
        inner
            .expect_add_user()
            .times(1)
            .returning(move |_| Ok(user.clone()));

        let service = LoggingCommandService::new(inner);
        let result = service.add_user(add_command()).await.unwrap();

        assert_eq!(result, expected);
        assert!(logs_contain("AddUser command received"));
        assert!(logs_contain("john@doe.com"));
        assert!(!logs_contain("hunter2"));
        assert!(!logs_contain("command failed"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_logs_failure_and_returns_same_error() {
        let id = UserId::new();
        let mut inner = MockCommandService::new();
        inner
            .expect_modify_user()
            .times(1)
            .returning(|cmd| Err(DomainError::UserNotFound(cmd.id)));

        let service = LoggingCommandService::new(inner);
        let result = service.modify_user(ModifyUserCommand::new(id)).await;

        assert!(matches!(result, Err(DomainError::UserNotFound(missing)) if missing == id));
        assert!(logs_contain("ModifyUser command received"));
        assert!(logs_contain("ModifyUser command failed"));
        assert!(logs_contain(&id.to_string()));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_delete_is_logged() {
        let mut inner = MockCommandService::new();
        inner.expect_delete_user().times(1).returning(|_| Ok(()));

        let service = LoggingCommandService::new(inner);
        service
            .delete_user(DeleteUserCommand::new(UserId::new()))
            .await
            .unwrap();

        assert!(logs_contain("DeleteUser command received"));
    }
}
