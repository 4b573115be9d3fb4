//! The user entity and its password handling.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A cleartext password as submitted by a caller.
///
/// Only ever hashed, never stored or serialized. `Debug` is redacted so the
/// value can't leak through command logging.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Returns the cleartext value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// User entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// Unique identifier, generated at creation.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    /// Argon2 PHC string (never exposed in responses).
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Required, advisory-unique email address.
    pub email: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh ID and a hashed password.
    ///
    /// Fails with [`DomainError::EmailRequired`] when `email` is empty.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        nickname: impl Into<String>,
        password: &Password,
        email: impl Into<String>,
        country: impl Into<String>,
    ) -> DomainResult<Self> {
        let email = email.into();
        if email.is_empty() {
            return Err(DomainError::EmailRequired);
        }

        let password_hash = hash_password(password.expose())?;
        let now = Utc::now();

        Ok(Self {
            id: UserId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: nickname.into(),
            password_hash,
            email,
            country: country.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks a cleartext candidate against the stored hash.
    pub fn verify_password(&self, candidate: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| DomainError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }
}

fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::PasswordHash(e.to_string()))
}
