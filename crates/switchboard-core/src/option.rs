//! Command option trees.
//!
//! A slash command declares an ordered list of [`CommandOption`]s. Subcommands
//! and subcommand groups own their own nested option lists, so the declaration
//! forms a tree whose depth equals the nesting of subcommands:
//!
//! ```text
//! /config                       (root)
//! ├── set        SubCommand     (position 0)
//! │   ├── key    String         (position 0)
//! │   └── value  String         (position 1)
//! └── reset      SubCommand     (position 1)
//! ```

use serde::{Deserialize, Serialize};

/// Type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl OptionKind {
    /// Returns `true` for kinds that own nested options.
    pub fn is_subcommand(&self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

/// A single option descriptor, possibly owning nested options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub autocomplete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// Creates an optional, non-autocompleted option.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            autocomplete: false,
            options: Vec::new(),
        }
    }

    /// Shorthand for a string option.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::String)
    }

    /// Shorthand for an integer option.
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::Integer)
    }

    /// Creates a subcommand owning the given options.
    pub fn subcommand(
        name: impl Into<String>,
        description: impl Into<String>,
        options: impl IntoIterator<Item = CommandOption>,
    ) -> Self {
        Self::new(name, description, OptionKind::SubCommand).with_options(options)
    }

    /// Creates a subcommand group owning the given subcommands.
    pub fn group(
        name: impl Into<String>,
        description: impl Into<String>,
        subcommands: impl IntoIterator<Item = CommandOption>,
    ) -> Self {
        Self::new(name, description, OptionKind::SubCommandGroup).with_options(subcommands)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = CommandOption>) -> Self {
        self.options.extend(options);
        self
    }
}

/// Returns the option list reached by descending one level per segment.
///
/// A segment with no matching option yields an empty list, and every deeper
/// segment stays empty.
pub fn descend<'a, S: AsRef<str>>(
    root: &'a [CommandOption],
    segments: impl IntoIterator<Item = S>,
) -> &'a [CommandOption] {
    let mut current = root;
    for segment in segments {
        let segment = segment.as_ref();
        current = current
            .iter()
            .find(|option| option.name == segment)
            .map(|option| option.options.as_slice())
            .unwrap_or(&[]);
    }
    current
}
