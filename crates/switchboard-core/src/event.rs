//! Inbound interaction events.
//!
//! The platform client translates whatever it receives from the wire into an
//! [`InteractionEvent`]. Each variant carries only the data relevant to its
//! kind:
//!
//! - [`CommandInvocation`] - a slash or context menu command was used
//! - [`AutocompleteRequest`] - the user is typing into an autocompleted option
//! - [`ComponentInteraction`] - a button, select menu or modal was used
//! - `ScopeLeft` - the application left a scope (for example it was removed
//!   from a server)

use serde::{Deserialize, Serialize};

use crate::kind::{CommandKind, ComponentKind};
use crate::scope::ScopeId;

/// An event delivered by the platform client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Command(CommandInvocation),
    Autocomplete(AutocompleteRequest),
    Component(ComponentInteraction),
    ScopeLeft { scope: ScopeId },
}

impl InteractionEvent {
    /// Short name used in logs and spans.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Autocomplete(_) => "autocomplete",
            Self::Component(_) => "component",
            Self::ScopeLeft { .. } => "scope_left",
        }
    }
}

impl From<CommandInvocation> for InteractionEvent {
    fn from(invocation: CommandInvocation) -> Self {
        Self::Command(invocation)
    }
}

impl From<AutocompleteRequest> for InteractionEvent {
    fn from(request: AutocompleteRequest) -> Self {
        Self::Autocomplete(request)
    }
}

impl From<ComponentInteraction> for InteractionEvent {
    fn from(interaction: ComponentInteraction) -> Self {
        Self::Component(interaction)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A single argument of a slash command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandArgument {
    pub name: String,
    pub value: serde_json::Value,
}

impl CommandArgument {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Renders the value the way a user would have typed it.
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Kind-specific payload of a command invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationData {
    Slash {
        /// Root name plus subcommand segments, separated by spaces.
        full_name: String,
        #[serde(default)]
        arguments: Vec<CommandArgument>,
    },
    UserContextMenu {
        target_user: u64,
    },
    MessageContextMenu {
        target_message: u64,
    },
}

/// A command was invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Root command name.
    pub name: String,
    /// Scope the invoked command is registered in; `None` for global commands.
    pub scope: Option<ScopeId>,
    pub data: InvocationData,
}

impl CommandInvocation {
    /// Creates a slash command invocation.
    ///
    /// The root name is the first segment of `full_name`.
    pub fn slash(
        full_name: impl Into<String>,
        scope: Option<ScopeId>,
        arguments: Vec<CommandArgument>,
    ) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            scope,
            data: InvocationData::Slash {
                full_name,
                arguments,
            },
        }
    }

    pub fn user_context_menu(name: impl Into<String>, scope: Option<ScopeId>, target_user: u64) -> Self {
        Self {
            name: name.into(),
            scope,
            data: InvocationData::UserContextMenu { target_user },
        }
    }

    pub fn message_context_menu(
        name: impl Into<String>,
        scope: Option<ScopeId>,
        target_message: u64,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            data: InvocationData::MessageContextMenu { target_message },
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self.data {
            InvocationData::Slash { .. } => CommandKind::Slash,
            InvocationData::UserContextMenu { .. } => CommandKind::UserContextMenu,
            InvocationData::MessageContextMenu { .. } => CommandKind::MessageContextMenu,
        }
    }

    /// Returns the full command path, or the plain name for context menus.
    pub fn full_name(&self) -> &str {
        match &self.data {
            InvocationData::Slash { full_name, .. } => full_name,
            _ => &self.name,
        }
    }

    /// Returns the slash command arguments; empty for context menus.
    pub fn arguments(&self) -> &[CommandArgument] {
        match &self.data {
            InvocationData::Slash { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Looks up a slash command argument by name.
    pub fn argument(&self, name: &str) -> Option<&CommandArgument> {
        self.arguments().iter().find(|arg| arg.name == name)
    }

    /// Formats the arguments as `name: value, name: value`.
    pub fn log_arguments(&self) -> String {
        self.arguments()
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.display_value()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Autocomplete
// ============================================================================

/// The user is typing into an option declared with autocompletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteRequest {
    /// Root command name.
    pub name: String,
    pub scope: Option<ScopeId>,
    /// Root name plus subcommand segments, separated by spaces.
    pub full_path: String,
    pub focused_option: String,
    /// What the user has typed so far.
    #[serde(default)]
    pub focused_value: String,
}

impl AutocompleteRequest {
    /// Creates a request; the root name is the first segment of `full_path`.
    pub fn new(
        full_path: impl Into<String>,
        scope: Option<ScopeId>,
        focused_option: impl Into<String>,
        focused_value: impl Into<String>,
    ) -> Self {
        let full_path = full_path.into();
        let name = full_path
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            scope,
            full_path,
            focused_option: focused_option.into(),
            focused_value: focused_value.into(),
        }
    }

    /// Subcommand segments after the root command name.
    pub fn subcommand_path(&self) -> impl Iterator<Item = &str> {
        self.full_path.split_whitespace().skip(1)
    }
}

// ============================================================================
// Components
// ============================================================================

/// A message component was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentInteraction {
    Button {
        custom_id: String,
    },
    SelectMenu {
        custom_id: String,
        #[serde(default)]
        values: Vec<String>,
    },
    Modal {
        custom_id: String,
        /// Submitted text inputs as `(custom id, value)` pairs.
        #[serde(default)]
        fields: Vec<(String, String)>,
    },
}

impl ComponentInteraction {
    pub fn button(custom_id: impl Into<String>) -> Self {
        Self::Button {
            custom_id: custom_id.into(),
        }
    }

    pub fn select_menu(custom_id: impl Into<String>, values: Vec<String>) -> Self {
        Self::SelectMenu {
            custom_id: custom_id.into(),
            values,
        }
    }

    pub fn modal(custom_id: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self::Modal {
            custom_id: custom_id.into(),
            fields,
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Button { .. } => ComponentKind::Button,
            Self::SelectMenu { .. } => ComponentKind::SelectMenu,
            Self::Modal { .. } => ComponentKind::Modal,
        }
    }

    pub fn custom_id(&self) -> &str {
        match self {
            Self::Button { custom_id }
            | Self::SelectMenu { custom_id, .. }
            | Self::Modal { custom_id, .. } => custom_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slash_invocation_root_name() {
        let inv = CommandInvocation::slash("parent child", Some(ScopeId(1)), vec![]);
        assert_eq!(inv.name, "parent");
        assert_eq!(inv.full_name(), "parent child");
        assert_eq!(inv.kind(), CommandKind::Slash);
    }

    #[test]
    fn test_log_arguments() {
        let inv = CommandInvocation::slash(
            "search",
            None,
            vec![
                CommandArgument::new("category", "books"),
                CommandArgument::new("limit", 5),
            ],
        );
        assert_eq!(inv.log_arguments(), "category: books, limit: 5");
        assert_eq!(inv.argument("limit").unwrap().value, json!(5));
    }

    #[test]
    fn test_context_menu_has_no_arguments() {
        let inv = CommandInvocation::user_context_menu("Report", None, 42);
        assert!(inv.arguments().is_empty());
        assert_eq!(inv.full_name(), "Report");
        assert_eq!(inv.kind(), CommandKind::UserContextMenu);
    }

    #[test]
    fn test_autocomplete_subcommand_path() {
        let req = AutocompleteRequest::new("config set", None, "key", "co");
        assert_eq!(req.name, "config");
        assert_eq!(req.subcommand_path().collect::<Vec<_>>(), ["set"]);
    }

    #[test]
    fn test_event_deserialize_component() {
        let event: InteractionEvent = serde_json::from_value(json!({
            "type": "component",
            "kind": "select_menu",
            "custom_id": "color",
            "values": ["red"]
        }))
        .unwrap();

        match event {
            InteractionEvent::Component(c) => {
                assert_eq!(c.kind(), ComponentKind::SelectMenu);
                assert_eq!(c.custom_id(), "color");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
