//! Pattern-based component routing.
//!
//! Every [`Component`] is compiled into an anchored regular expression when it
//! is registered. Routing a custom id runs it against every pattern of the
//! interaction's kind and classifies the result:
//!
//! | Matches | Result                  | Dispatcher behaviour          |
//! |---------|-------------------------|-------------------------------|
//! | 0       | [`RouteMatch::NoMatch`] | dropped, logged               |
//! | 1       | [`RouteMatch::Unique`]  | handler invoked               |
//! | 2+      | [`RouteMatch::Ambiguous`] | dropped, every match logged |
//!
//! Patterns are neither deduplicated nor ordered. Overlapping patterns are
//! allowed at registration and only show up as ambiguity at routing time.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;
use switchboard_core::ComponentKind;
use tracing::debug;

use crate::component::Component;
use crate::error::{RegistrationError, RegistrationResult};

struct Route {
    regex: Regex,
    component: Arc<Component>,
}

/// Result of routing a custom id.
#[derive(Debug, Clone)]
pub enum RouteMatch {
    NoMatch,
    Unique(Arc<Component>),
    /// Every component whose pattern matched, in registration order.
    Ambiguous(Vec<Arc<Component>>),
}

/// Router from component custom ids to handlers.
#[derive(Default)]
pub struct ComponentRouter {
    routes: RwLock<HashMap<ComponentKind, Vec<Route>>>,
}

impl ComponentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the component's pattern and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn register(&self, component: Component) -> RegistrationResult<()> {
        let anchored = format!("^(?:{})$", component.pattern());
        let regex = Regex::new(&anchored).map_err(|e| RegistrationError::InvalidPattern {
            pattern: component.pattern().to_string(),
            reason: e.to_string(),
        })?;

        debug!(
            kind = %component.kind(),
            pattern = component.pattern(),
            handler = component.handler_name(),
            "Registered component"
        );

        self.routes
            .write()
            .entry(component.kind())
            .or_default()
            .push(Route {
                regex,
                component: Arc::new(component),
            });
        Ok(())
    }

    /// Registers a batch of components, stopping at the first failure.
    pub fn register_all(&self, components: impl IntoIterator<Item = Component>) -> RegistrationResult<()> {
        components
            .into_iter()
            .try_for_each(|component| self.register(component))
    }

    /// Finds the components whose pattern matches the whole custom id.
    pub fn route(&self, kind: ComponentKind, custom_id: &str) -> RouteMatch {
        let routes = self.routes.read();
        let mut matched: Vec<Arc<Component>> = routes
            .get(&kind)
            .into_iter()
            .flatten()
            .filter(|route| route.regex.is_match(custom_id))
            .map(|route| Arc::clone(&route.component))
            .collect();

        match matched.len() {
            0 => RouteMatch::NoMatch,
            1 => RouteMatch::Unique(matched.remove(0)),
            _ => RouteMatch::Ambiguous(matched),
        }
    }

    /// Number of registered components of every kind.
    pub fn len(&self) -> usize {
        self.routes.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ComponentRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRouter")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use switchboard_core::ComponentInteraction;

    async fn buy(_interaction: Arc<ComponentInteraction>) {}

    async fn catch_all(_interaction: Arc<ComponentInteraction>) {}

    #[test]
    fn test_unique_match() {
        let router = ComponentRouter::new();
        router.register(Component::button(r"buy_\d+", buy)).unwrap();

        match router.route(ComponentKind::Button, "buy_3") {
            RouteMatch::Unique(component) => assert_eq!(component.pattern(), r"buy_\d+"),
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_match_names_all() {
        let router = ComponentRouter::new();
        router.register(Component::button(r"buy_\d+", buy)).unwrap();
        router
            .register(Component::button("buy_.*", catch_all).name("CatchAll"))
            .unwrap();

        match router.route(ComponentKind::Button, "buy_3") {
            RouteMatch::Ambiguous(components) => {
                let patterns: Vec<_> = components.iter().map(|c| c.pattern()).collect();
                assert_eq!(patterns, [r"buy_\d+", "buy_.*"]);
                assert_eq!(components[1].handler_name(), "CatchAll");
            }
            other => panic!("unexpected match: {other:?}"),
        }

        // Only the catch-all matches a non-numeric suffix.
        assert!(matches!(router.route(ComponentKind::Button, "buy_x"), RouteMatch::Unique(_)));
    }

    #[test]
    fn test_pattern_must_match_whole_id() {
        let router = ComponentRouter::new();
        router.register(Component::button(r"buy_\d+", buy)).unwrap();

        assert!(matches!(router.route(ComponentKind::Button, "rebuy_3"), RouteMatch::NoMatch));
        assert!(matches!(router.route(ComponentKind::Button, "buy_3x"), RouteMatch::NoMatch));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let router = ComponentRouter::new();
        router.register(Component::select_menu("color|size", buy)).unwrap();

        assert!(matches!(router.route(ComponentKind::SelectMenu, "size"), RouteMatch::Unique(_)));
        assert!(matches!(router.route(ComponentKind::SelectMenu, "colors"), RouteMatch::NoMatch));
    }

    #[test]
    fn test_kinds_are_partitioned() {
        let router = ComponentRouter::new();
        router.register(Component::modal("feedback", buy)).unwrap();

        assert!(matches!(router.route(ComponentKind::Button, "feedback"), RouteMatch::NoMatch));
        assert!(matches!(router.route(ComponentKind::Modal, "feedback"), RouteMatch::Unique(_)));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let router = ComponentRouter::new();
        router.register(Component::button("same", buy)).unwrap();
        router.register(Component::button("same", buy)).unwrap();

        assert_eq!(router.len(), 2);
        assert!(matches!(router.route(ComponentKind::Button, "same"), RouteMatch::Ambiguous(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let router = ComponentRouter::new();
        let err = router.register(Component::button("buy_(", buy)).unwrap_err();

        assert!(matches!(err, RegistrationError::InvalidPattern { ref pattern, .. } if pattern == "buy_("));
        assert!(router.is_empty());
    }

    #[test]
    fn test_concurrent_register_and_route() {
        let router = Arc::new(ComponentRouter::new());
        router.register(Component::button(r"buy_\d+", buy)).unwrap();

        let writer = {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for i in 0..100 {
                    router
                        .register(Component::button(format!("item{i}_[a-z]+"), catch_all))
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let router = Arc::clone(&router);
                thread::spawn(move || {
                    for i in 0..100 {
                        match router.route(ComponentKind::Button, &format!("buy_{i}")) {
                            RouteMatch::Unique(component) => {
                                assert_eq!(component.pattern(), r"buy_\d+");
                            }
                            other => panic!("unexpected match: {other:?}"),
                        }
                        match router.route(ComponentKind::Button, &format!("item{i}_red")) {
                            RouteMatch::NoMatch => {}
                            RouteMatch::Unique(component) => {
                                assert_eq!(component.pattern(), format!("item{i}_[a-z]+"));
                            }
                            other => panic!("unexpected match: {other:?}"),
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(router.len(), 101);
        assert!(matches!(
            router.route(ComponentKind::Button, "item99_red"),
            RouteMatch::Unique(_)
        ));
    }
}
