//! Message components.
//!
//! A [`Component`] binds a regular expression over custom ids to a handler for
//! one [`ComponentKind`]. Patterns have to match the whole custom id, so
//! `buy_\d+` matches `buy_3` but not `rebuy_3`.

use switchboard_core::{ComponentInteraction, ComponentKind};

use crate::handler::{BoxedHandler, Handler, handler_name, into_handler};

/// A component handler together with the custom ids it accepts.
pub struct Component {
    pattern: String,
    kind: ComponentKind,
    name: String,
    handler: BoxedHandler<ComponentInteraction>,
}

impl Component {
    /// Creates a component for `kind`.
    ///
    /// The handler's type name is used as its identity in diagnostics until
    /// [`name`](Self::name) sets a nicer one. Closures all share the name of
    /// their enclosing function, so their default identity also carries the
    /// pattern. Prefer an explicit [`name`](Self::name) for closures.
    pub fn new<H>(kind: ComponentKind, pattern: impl Into<String>, handler: H) -> Self
    where
        H: Handler<ComponentInteraction>,
    {
        let pattern = pattern.into();
        let handler_name = handler_name::<H>();
        let name = if handler_name.contains("{{closure}}") {
            format!("{handler_name} /{pattern}/")
        } else {
            handler_name.to_string()
        };
        Self {
            pattern,
            kind,
            name,
            handler: into_handler(handler),
        }
    }

    pub fn button<H>(pattern: impl Into<String>, handler: H) -> Self
    where
        H: Handler<ComponentInteraction>,
    {
        Self::new(ComponentKind::Button, pattern, handler)
    }

    pub fn select_menu<H>(pattern: impl Into<String>, handler: H) -> Self
    where
        H: Handler<ComponentInteraction>,
    {
        Self::new(ComponentKind::SelectMenu, pattern, handler)
    }

    pub fn modal<H>(pattern: impl Into<String>, handler: H) -> Self
    where
        H: Handler<ComponentInteraction>,
    {
        Self::new(ComponentKind::Modal, pattern, handler)
    }

    /// Sets the identity shown in ambiguity diagnostics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn handler_name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &BoxedHandler<ComponentInteraction> {
        &self.handler
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish()
    }
}
