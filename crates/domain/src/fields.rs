//! Partial-update field maps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// A user attribute that can be filtered on or modified.
///
/// Password is deliberately absent: it is neither filterable nor part of a
/// partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Nickname,
    Email,
    Country,
}

impl Field {
    /// All fields, in declaration order.
    pub const ALL: [Field; 5] = [
        Field::FirstName,
        Field::LastName,
        Field::Nickname,
        Field::Email,
        Field::Country,
    ];

    /// Returns the storage column name for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Nickname => "nickname",
            Field::Email => "email",
            Field::Country => "country",
        }
    }

    /// Reads this field's current value from a user.
    pub fn value_of<'a>(&self, user: &'a User) -> &'a str {
        match self {
            Field::FirstName => &user.first_name,
            Field::LastName => &user.last_name,
            Field::Nickname => &user.nickname,
            Field::Email => &user.email,
            Field::Country => &user.country,
        }
    }

    fn slot<'a>(&self, user: &'a mut User) -> &'a mut String {
        match self {
            Field::FirstName => &mut user.first_name,
            Field::LastName => &mut user.last_name,
            Field::Nickname => &mut user.nickname,
            Field::Email => &mut user.email,
            Field::Country => &mut user.country,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New values for the subset of fields a caller actually set.
///
/// An empty map is a valid no-op update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<Field, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field's new value, replacing any earlier one.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Builder-style [`Fields::set`].
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the set fields in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Writes the set fields into `user` and stamps `updated_at`.
    ///
    /// Leaves the user untouched when no field is set.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        for (field, value) in self.iter() {
            *field.slot(user) = value.to_owned();
        }
        user.updated_at = now;
    }
}

impl FromIterator<(Field, String)> for Fields {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
