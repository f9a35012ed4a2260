//! Application commands.
//!
//! A [`Command`] is one record carrying its name, whether it is global or
//! scoped, and a kind-specific [`CommandAction`]. Only slash commands have
//! options and autocompletion; context menu commands are just a handler.
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard_framework::Command;
//! use switchboard_core::CommandOption;
//!
//! let search = Command::slash("search", "Search the catalog", search_handler)
//!     .option(CommandOption::string("category", "Category").autocomplete(true))
//!     .option(CommandOption::string("query", "Query").autocomplete(true))
//!     .autocomplete(0, complete_category)
//!     .autocomplete(1, complete_query)
//!     .build()?;
//!
//! let report = Command::user_context_menu("Report user", report_handler)
//!     .scoped()
//!     .build();
//! ```

use switchboard_core::{
    AutocompleteRequest, CommandDescriptor, CommandInvocation, CommandKind, CommandOption,
    ScopeKind,
};

use crate::autocomplete::AutocompleteTable;
use crate::error::RegistrationResult;
use crate::handler::{BoxedHandler, Handler, into_handler};

/// Kind-specific part of a command.
pub enum CommandAction {
    Slash {
        description: String,
        options: Vec<CommandOption>,
        handler: BoxedHandler<CommandInvocation>,
        autocomplete: AutocompleteTable,
    },
    UserContextMenu {
        handler: BoxedHandler<CommandInvocation>,
    },
    MessageContextMenu {
        handler: BoxedHandler<CommandInvocation>,
    },
}

/// A registered application command. Immutable once built.
pub struct Command {
    name: String,
    scope_kind: ScopeKind,
    action: CommandAction,
}

impl Command {
    /// Starts building a global slash command.
    pub fn slash<H>(name: impl Into<String>, description: impl Into<String>, handler: H) -> SlashCommandBuilder
    where
        H: Handler<CommandInvocation>,
    {
        SlashCommandBuilder {
            name: name.into(),
            description: description.into(),
            scope_kind: ScopeKind::Global,
            options: Vec::new(),
            handler: into_handler(handler),
            autocomplete: Vec::new(),
        }
    }

    /// Starts building a global user context menu command.
    pub fn user_context_menu<H>(name: impl Into<String>, handler: H) -> ContextMenuBuilder
    where
        H: Handler<CommandInvocation>,
    {
        ContextMenuBuilder {
            name: name.into(),
            scope_kind: ScopeKind::Global,
            action: CommandAction::UserContextMenu {
                handler: into_handler(handler),
            },
        }
    }

    /// Starts building a global message context menu command.
    pub fn message_context_menu<H>(name: impl Into<String>, handler: H) -> ContextMenuBuilder
    where
        H: Handler<CommandInvocation>,
    {
        ContextMenuBuilder {
            name: name.into(),
            scope_kind: ScopeKind::Global,
            action: CommandAction::MessageContextMenu {
                handler: into_handler(handler),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope_kind(&self) -> ScopeKind {
        self.scope_kind
    }

    pub fn is_global(&self) -> bool {
        self.scope_kind == ScopeKind::Global
    }

    pub fn kind(&self) -> CommandKind {
        match self.action {
            CommandAction::Slash { .. } => CommandKind::Slash,
            CommandAction::UserContextMenu { .. } => CommandKind::UserContextMenu,
            CommandAction::MessageContextMenu { .. } => CommandKind::MessageContextMenu,
        }
    }

    pub fn action(&self) -> &CommandAction {
        &self.action
    }

    /// Returns the invocation handler.
    pub fn handler(&self) -> &BoxedHandler<CommandInvocation> {
        match &self.action {
            CommandAction::Slash { handler, .. }
            | CommandAction::UserContextMenu { handler }
            | CommandAction::MessageContextMenu { handler } => handler,
        }
    }

    /// Declared options; empty for context menu commands.
    pub fn options(&self) -> &[CommandOption] {
        match &self.action {
            CommandAction::Slash { options, .. } => options,
            _ => &[],
        }
    }

    /// Returns the autocompletion table of a slash command.
    pub fn autocomplete(&self) -> Option<&AutocompleteTable> {
        match &self.action {
            CommandAction::Slash { autocomplete, .. } => Some(autocomplete),
            _ => None,
        }
    }

    /// Builds the descriptor pushed to the platform.
    pub fn descriptor(&self) -> CommandDescriptor {
        let (description, options) = match &self.action {
            CommandAction::Slash {
                description,
                options,
                ..
            } => (description.clone(), options.clone()),
            _ => (String::new(), Vec::new()),
        };
        CommandDescriptor {
            name: self.name.clone(),
            description,
            kind: self.kind(),
            options,
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("scope_kind", &self.scope_kind)
            .field("options", &self.options().len())
            .finish()
    }
}

/// Builder for slash commands.
pub struct SlashCommandBuilder {
    name: String,
    description: String,
    scope_kind: ScopeKind,
    options: Vec<CommandOption>,
    handler: BoxedHandler<CommandInvocation>,
    autocomplete: Vec<(usize, BoxedHandler<AutocompleteRequest>)>,
}

impl SlashCommandBuilder {
    /// Declares the command as scoped instead of global.
    pub fn scoped(mut self) -> Self {
        self.scope_kind = ScopeKind::Scoped;
        self
    }

    /// Sets the scope kind.
    pub fn scope_kind(mut self, scope_kind: ScopeKind) -> Self {
        self.scope_kind = scope_kind;
        self
    }

    /// Appends a top-level option.
    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Appends several top-level options.
    pub fn options(mut self, options: impl IntoIterator<Item = CommandOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Binds an autocompletion handler to an option position.
    ///
    /// The position is the index of the option in whichever option list it is
    /// declared in, so the same slot serves every subcommand of this command.
    pub fn autocomplete<H>(mut self, position: usize, handler: H) -> Self
    where
        H: Handler<AutocompleteRequest>,
    {
        self.autocomplete.push((position, into_handler(handler)));
        self
    }

    /// Finishes the command.
    ///
    /// # Errors
    ///
    /// Fails when an autocompletion handler was bound past the capacity.
    pub fn build(self) -> RegistrationResult<Command> {
        let mut table = AutocompleteTable::new();
        for (position, handler) in self.autocomplete {
            table.set_boxed(position, handler)?;
        }

        Ok(Command {
            name: self.name,
            scope_kind: self.scope_kind,
            action: CommandAction::Slash {
                description: self.description,
                options: self.options,
                handler: self.handler,
                autocomplete: table,
            },
        })
    }
}

/// Builder for user and message context menu commands.
pub struct ContextMenuBuilder {
    name: String,
    scope_kind: ScopeKind,
    action: CommandAction,
}

impl ContextMenuBuilder {
    /// Declares the command as scoped instead of global.
    pub fn scoped(mut self) -> Self {
        self.scope_kind = ScopeKind::Scoped;
        self
    }

    pub fn scope_kind(mut self, scope_kind: ScopeKind) -> Self {
        self.scope_kind = scope_kind;
        self
    }

    pub fn build(self) -> Command {
        Command {
            name: self.name,
            scope_kind: self.scope_kind,
            action: self.action,
        }
    }
}
