//! Domain error types.

use common::UserId;
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Validation and business-rule variants are returned to callers as-is; no
/// decorator is allowed to mask them. [`DomainError::Storage`] is the opaque
/// passthrough for whatever the persistence adapter failed with.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A user can't be created without an email address.
    #[error("Email is required")]
    EmailRequired,

    /// Another user already registered this email.
    #[error("User with email '{0}' already exists")]
    EmailExists(String),

    /// The repository already holds a user with this ID.
    #[error("User already exists: {0}")]
    UserAlreadyExists(UserId),

    /// The repository has no user with this ID.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Pagination input that can't be turned into a window.
    #[error("Invalid pagination: offset {offset} must not be negative")]
    InvalidPagination { offset: i64 },

    /// The password could not be hashed or a stored hash could not be parsed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// A command could not be encoded into an event.
    #[error("Event encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The underlying storage failed.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DomainError {
    /// Wraps an adapter error into the opaque storage category.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DomainError::Storage(Box::new(err))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
