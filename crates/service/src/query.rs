use async_trait::async_trait;
use domain::{DomainResult, Filter, Pagination, User, UserRepository};

/// Read side of the service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Lists users matching `filter`, windowed by `pagination`.
    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>>;
}

#[async_trait]
impl<T: QueryService + ?Sized> QueryService for std::sync::Arc<T> {
    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>> {
        (**self).users(filter, pagination).await
    }
}

/// Query service that reads straight from the repository.
///
/// Queries bypass the command decorators: they are neither logged as
/// commands nor turned into events.
pub struct UserQueryService<R> {
    repository: R,
}

impl<R: UserRepository> UserQueryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: UserRepository> QueryService for UserQueryService<R> {
    #[tracing::instrument(skip(self))]
    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>> {
        self.repository.users(filter, pagination).await
    }
}
