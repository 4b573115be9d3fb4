//! Query filters shared by the query path and the email-uniqueness check.

use serde::{Deserialize, Serialize};

use crate::fields::Field;
use crate::user::User;

/// Conjunctive exact-match filter over user attributes.
///
/// `None` means "not applied". An empty filter matches every user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

impl Filter {
    /// Creates a filter where every empty argument becomes an absent
    /// predicate rather than a match on the empty string.
    pub fn new(
        first_name: &str,
        last_name: &str,
        nickname: &str,
        email: &str,
        country: &str,
    ) -> Self {
        Self {
            first_name: non_empty(first_name),
            last_name: non_empty(last_name),
            nickname: non_empty(nickname),
            email: non_empty(email),
            country: non_empty(country),
        }
    }

    /// Filter matching a single email address.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => self.first_name.as_deref(),
            Field::LastName => self.last_name.as_deref(),
            Field::Nickname => self.nickname.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Country => self.country.as_deref(),
        }
    }

    /// Iterates over the predicates that are present.
    pub fn predicates(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates().next().is_none()
    }

    /// Returns true if every present predicate equals the user's value.
    pub fn matches(&self, user: &User) -> bool {
        self.predicates()
            .all(|(field, value)| field.value_of(user) == value)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
