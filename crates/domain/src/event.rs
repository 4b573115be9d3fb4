//! Events announcing accepted commands.

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::command::{AddUserCommand, DeleteUserCommand, ModifyUserCommand};

/// Discriminant of an [`Event`], used as the wire tag and in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "user-added")]
    UserAdded,
    #[serde(rename = "user-modified")]
    UserModified,
    #[serde(rename = "user-deleted")]
    UserDeleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserAdded => "user-added",
            EventKind::UserModified => "user-modified",
            EventKind::UserDeleted => "user-deleted",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-describing record of a command, serialized as
/// `{"kind": "...", "command": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "command")]
pub enum Event {
    #[serde(rename = "user-added")]
    UserAdded(AddUserCommand),
    #[serde(rename = "user-modified")]
    UserModified(ModifyUserCommand),
    #[serde(rename = "user-deleted")]
    UserDeleted(DeleteUserCommand),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::UserAdded(_) => EventKind::UserAdded,
            Event::UserModified(_) => EventKind::UserModified,
            Event::UserDeleted(_) => EventKind::UserDeleted,
        }
    }

    /// The user the event targets. `None` for additions, whose ID is only
    /// assigned by the command handler.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Event::UserAdded(_) => None,
            Event::UserModified(cmd) => Some(cmd.id),
            Event::UserDeleted(cmd) => Some(cmd.id),
        }
    }
}
