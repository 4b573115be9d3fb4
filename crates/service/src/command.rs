//! Write side of the service and its base implementation.

use async_trait::async_trait;
use domain::{
    AddUserCommand, DeleteUserCommand, DomainError, DomainResult, Filter, ModifyUserCommand,
    Pagination, User, UserRepository,
};

/// Handles user commands.
///
/// Decorators implement this same trait around an inner service, so the
/// base service and every decorated stack are interchangeable.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandService: Send + Sync {
    /// Registers a new user and returns it as stored.
    async fn add_user(&self, command: AddUserCommand) -> DomainResult<User>;

    /// Applies the fields set on the command to an existing user.
    async fn modify_user(&self, command: ModifyUserCommand) -> DomainResult<()>;

    /// Deletes an existing user.
    async fn delete_user(&self, command: DeleteUserCommand) -> DomainResult<()>;
}

#[async_trait]
impl<T: CommandService + ?Sized> CommandService for std::sync::Arc<T> {
    async fn add_user(&self, command: AddUserCommand) -> DomainResult<User> {
        (**self).add_user(command).await
    }

    async fn modify_user(&self, command: ModifyUserCommand) -> DomainResult<()> {
        (**self).modify_user(command).await
    }

    async fn delete_user(&self, command: DeleteUserCommand) -> DomainResult<()> {
        (**self).delete_user(command).await
    }
}

/// Command service that validates commands and writes to the repository.
pub struct UserCommandService<R> {
    repository: R,
}

impl<R: UserRepository> UserCommandService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: UserRepository> CommandService for UserCommandService<R> {
    /// Email uniqueness is checked with a query before the insert. Two
    /// concurrent adds with the same email can both pass the check.
    #[tracing::instrument(skip(self, command))]
    async fn add_user(&self, command: AddUserCommand) -> DomainResult<User> {
        let AddUserCommand {
            first_name,
            last_name,
            nickname,
            password,
            email,
            country,
        } = command;

        let user = User::new(first_name, last_name, nickname, &password, email, country)?;

        let existing = self
            .repository
            .users(Filter::by_email(user.email.clone()), Pagination::default())
            .await?;
        if !existing.is_empty() {
            return Err(DomainError::EmailExists(user.email));
        }

        self.repository.add_user(user.clone()).await?;
        tracing::debug!(user_id = %user.id, "user added");

        Ok(user)
    }

    #[tracing::instrument(skip(self, command), fields(user_id = %command.id))]
    async fn modify_user(&self, command: ModifyUserCommand) -> DomainResult<()> {
        let fields = command.fields_to_update();
        self.repository.modify_user(command.id, fields).await
    }

    #[tracing::instrument(skip(self, command), fields(user_id = %command.id))]
    async fn delete_user(&self, command: DeleteUserCommand) -> DomainResult<()> {
        self.repository.remove_user(command.id).await
    }
}
