//! User commands.
//!
//! Commands are transient requests to change state. They are never persisted
//! themselves, but each one encodes deterministically into an [`Event`].

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::event::Event;
use crate::fields::{Field, Fields};
use crate::user::Password;

/// A state-changing request that can be encoded into an event.
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Name used in logs and metrics.
    const NAME: &'static str;

    /// Encodes the command into the event announcing it.
    ///
    /// Must be deterministic and free of side effects.
    fn encode_event(&self) -> DomainResult<Event>;
}

/// Command to register a new user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    /// Never part of the encoded event.
    #[serde(skip)]
    pub password: Password,
    pub email: String,
    pub country: String,
}

impl Command for AddUserCommand {
    const NAME: &'static str = "AddUser";

    fn encode_event(&self) -> DomainResult<Event> {
        Ok(Event::UserAdded(self.clone()))
    }
}

/// Command to change some of a user's attributes.
///
/// Only fields set to `Some` are written; the rest are left as stored.
/// Passwords can't be changed through this command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyUserCommand {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ModifyUserCommand {
    /// Creates a command that changes nothing yet.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            nickname: None,
            email: None,
            country: None,
        }
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn nickname(mut self, value: impl Into<String>) -> Self {
        self.nickname = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    /// Collects the fields the caller actually set.
    pub fn fields_to_update(&self) -> Fields {
        [
            (Field::FirstName, &self.first_name),
            (Field::LastName, &self.last_name),
            (Field::Nickname, &self.nickname),
            (Field::Email, &self.email),
            (Field::Country, &self.country),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
        .collect()
    }
}

impl Command for ModifyUserCommand {
    const NAME: &'static str = "ModifyUser";

    fn encode_event(&self) -> DomainResult<Event> {
        Ok(Event::UserModified(self.clone()))
    }
}

/// Command to delete a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub id: UserId,
}

impl DeleteUserCommand {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }
}

impl Command for DeleteUserCommand {
    const NAME: &'static str = "DeleteUser";

    fn encode_event(&self) -> DomainResult<Event> {
        Ok(Event::UserDeleted(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    #[test]
    fn test_modify_user_command_fields_to_update() {
        let id = UserId::new();
        let cases = [
            ("empty", ModifyUserCommand::new(id), Fields::new()),
            (
                "first_name",
                ModifyUserCommand::new(id).first_name("John"),
                Fields::new().with(Field::FirstName, "John"),
            ),
            (
                "last_name",
                ModifyUserCommand::new(id).last_name("Doe"),
                Fields::new().with(Field::LastName, "Doe"),
            ),
            (
                "nickname",
                ModifyUserCommand::new(id).nickname("jdoe"),
                Fields::new().with(Field::Nickname, "jdoe"),
            ),
            (
                "email",
                ModifyUserCommand::new(id).email("j@doe.com"),
                Fields::new().with(Field::Email, "j@doe.com"),
            ),
            (
                "country",
                ModifyUserCommand::new(id).country("UK"),
                Fields::new().with(Field::Country, "UK"),
            ),
            (
                "several",
                ModifyUserCommand::new(id).first_name("Alex").country("PL"),
                Fields::new()
                    .with(Field::FirstName, "Alex")
                    .with(Field::Country, "PL"),
            ),
        ];

        for (name, command, want) in cases {
            assert_eq!(command.fields_to_update(), want, "{name}");
        }
    }

    #[test]
    fn test_set_empty_string_is_still_an_update() {
        let command = ModifyUserCommand::new(UserId::new()).nickname("");
        assert_eq!(command.fields_to_update().get(Field::Nickname), Some(""));
    }

    #[test]
    fn test_commands_encode_tagged_events() {
        let id = UserId::new();

        let added = AddUserCommand::default().encode_event().unwrap();
        let modified = ModifyUserCommand::new(id).encode_event().unwrap();
        let deleted = DeleteUserCommand::new(id).encode_event().unwrap();

        assert_eq!(added.kind(), EventKind::UserAdded);
        assert_eq!(modified.kind(), EventKind::UserModified);
        assert_eq!(deleted.kind(), EventKind::UserDeleted);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let command = ModifyUserCommand::new(UserId::new()).email("a@b.c");
        assert_eq!(
            command.encode_event().unwrap(),
            command.encode_event().unwrap()
        );
    }

    #[test]
    fn test_add_user_debug_hides_password() {
        let command = AddUserCommand {
            email: "j@doe.com".to_string(),
            password: Password::new("hunter2"),
            ..Default::default()
        };

        let debug = format!("{command:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("j@doe.com"));
    }
}
