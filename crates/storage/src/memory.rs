use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::UserId;
use domain::{DomainError, DomainResult, Fields, Filter, Pagination, User, UserRepository};
use tokio::sync::RwLock;

/// In-memory user repository implementation for testing.
///
/// Users are kept in insertion order, which is also the listing order.
/// Clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `users`, in order.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users.into_iter().collect())),
        }
    }

    /// Returns the total number of users stored.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Returns a copy of the stored user with the given ID.
    pub async fn get(&self, id: UserId) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Clears all users.
    pub async fn clear(&self) {
        self.users.write().await.clear();
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add_user(&self, user: User) -> DomainResult<()> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id == user.id) {
            return Err(DomainError::UserAlreadyExists(user.id));
        }
        users.push(user);

        Ok(())
    }

    async fn modify_user(&self, id: UserId, fields: Fields) -> DomainResult<()> {
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        fields.apply_to(user, Utc::now());

        Ok(())
    }

    async fn remove_user(&self, id: UserId) -> DomainResult<()> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        users.remove(index);

        Ok(())
    }

    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>> {
        let users = self.users.read().await;

        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .skip(pagination.offset())
            .take(pagination.limit())
            .cloned()
            .collect())
    }
}
