//! Domain layer for the users service.
//!
//! This crate provides:
//! - The `User` entity and password hashing
//! - Commands and the events they encode into
//! - Query inputs (`Filter`, `Pagination`) and partial updates (`Fields`)
//! - The `UserRepository` storage capability

pub mod command;
pub mod error;
pub mod event;
pub mod fields;
pub mod filter;
pub mod pagination;
pub mod repository;
pub mod user;

pub use command::{AddUserCommand, Command, DeleteUserCommand, ModifyUserCommand};
pub use error::{DomainError, DomainResult};
pub use event::{Event, EventKind};
pub use fields::{Field, Fields};
pub use filter::Filter;
pub use pagination::{DEFAULT_PAGINATION_LIMIT, MAX_PAGINATION_LIMIT, Pagination, PaginationConfig};
pub use repository::UserRepository;
pub use user::{Password, User};

#[cfg(any(test, feature = "mock"))]
pub use repository::MockUserRepository;
