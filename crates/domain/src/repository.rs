use async_trait::async_trait;
use common::UserId;

use crate::error::DomainResult;
use crate::fields::Fields;
use crate::filter::Filter;
use crate::pagination::Pagination;
use crate::user::User;

/// Storage capability for users.
///
/// Implementations must be safe for concurrent use and must not enforce
/// email uniqueness themselves; that check lives in the command handler.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// Fails with `UserAlreadyExists` if a user with the same ID is stored.
    async fn add_user(&self, user: User) -> DomainResult<()>;

    /// Applies a partial update to the user with the given ID.
    ///
    /// Fails with `UserNotFound` if no such user exists. An empty `fields`
    /// still checks existence but changes nothing.
    async fn modify_user(&self, id: UserId, fields: Fields) -> DomainResult<()>;

    /// Deletes the user with the given ID.
    ///
    /// Fails with `UserNotFound` if no such user exists.
    async fn remove_user(&self, id: UserId) -> DomainResult<()>;

    /// Lists users matching `filter`, windowed by `pagination`.
    ///
    /// Results are ordered by insertion; an out-of-range offset yields an
    /// empty list rather than an error.
    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for std::sync::Arc<T> {
    async fn add_user(&self, user: User) -> DomainResult<()> {
        (**self).add_user(user).await
    }

    async fn modify_user(&self, id: UserId, fields: Fields) -> DomainResult<()> {
        (**self).modify_user(id, fields).await
    }

    async fn remove_user(&self, id: UserId) -> DomainResult<()> {
        (**self).remove_user(id).await
    }

    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>> {
        (**self).users(filter, pagination).await
    }
}
