//! Closed sets of interaction kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of application command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// A `/name` command typed into the chat box.
    Slash,
    /// A command in the context menu of a user.
    UserContextMenu,
    /// A command in the context menu of a message.
    MessageContextMenu,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::UserContextMenu => "user_context_menu",
            Self::MessageContextMenu => "message_context_menu",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of message component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Button,
    SelectMenu,
    Modal,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::SelectMenu => "select_menu",
            Self::Modal => "modal",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
