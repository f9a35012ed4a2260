//! Platform-facing command descriptors.
//!
//! A [`CommandDescriptor`] is what gets pushed to the platform during a bulk
//! overwrite; a [`RegisteredCommand`] is what the platform answers with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::CommandKind;
use crate::option::CommandOption;

/// Platform-assigned identifier of a registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a command as the platform needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    /// Empty for context menu commands.
    #[serde(default)]
    pub description: String,
    pub kind: CommandKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// A command as registered on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCommand {
    pub id: CommandId,
    pub name: String,
    pub kind: CommandKind,
}

impl RegisteredCommand {
    /// Sort key used for deterministic output.
    pub fn sort_key(&self) -> (CommandKind, &str) {
        (self.kind, self.name.as_str())
    }
}
