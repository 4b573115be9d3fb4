//! User repository implementations.
//!
//! - [`InMemoryUserRepository`] for development and tests
//! - [`PostgresUserRepository`] backed by a `users` table

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{Result, StorageError};
pub use memory::InMemoryUserRepository;
pub use postgres::PostgresUserRepository;
