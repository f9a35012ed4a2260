//! Positional autocompletion.
//!
//! Autocompletion handlers are bound to the ordinal position of an option in
//! its command's declared option list, not to the option name. When an
//! autocomplete request arrives, the resolver walks the command's option tree
//! along the request's subcommand path and looks up the focused option's
//! position in the leaf list:
//!
//! ```text
//! /shop buy item:<focused> amount:3
//!
//! shop ─▶ buy ─▶ [item, amount]
//!                  ▲
//!                  position 0 ─▶ handler bound to slot 0
//! ```
//!
//! Every command owns an [`AutocompleteTable`] with [`AUTOCOMPLETE_CAPACITY`]
//! slots. Slots that were never overridden fall back to a shared default
//! handler, which only logs that the position has no handler.

use std::sync::{Arc, LazyLock};

use switchboard_core::{AutocompleteRequest, CommandOption, descend};
use tracing::info;

use crate::error::{RegistrationError, RegistrationResult};
use crate::handler::{BoxedHandler, Handler, into_handler};

/// Maximum number of options a command may declare on the platform.
pub const AUTOCOMPLETE_CAPACITY: usize = 25;

static FALLBACK: LazyLock<BoxedHandler<AutocompleteRequest>> =
    LazyLock::new(|| into_handler(not_overridden));

/// The default handler used by every slot that was not overridden.
async fn not_overridden(request: Arc<AutocompleteRequest>) {
    info!(
        command = %request.full_path,
        focused = %request.focused_option,
        "Autocompletion handler not overridden for this position; \
         check the position of the autocompleted option"
    );
}

/// Positional table of autocompletion handlers for one command.
#[derive(Clone)]
pub struct AutocompleteTable {
    slots: Vec<Option<BoxedHandler<AutocompleteRequest>>>,
}

impl Default for AutocompleteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocompleteTable {
    /// Creates a table where every position uses the default handler.
    pub fn new() -> Self {
        Self {
            slots: vec![None; AUTOCOMPLETE_CAPACITY],
        }
    }

    /// Binds a handler to `position`.
    ///
    /// Binding the same position twice keeps the last handler.
    pub fn set<H>(&mut self, position: usize, handler: H) -> RegistrationResult<()>
    where
        H: Handler<AutocompleteRequest>,
    {
        self.set_boxed(position, into_handler(handler))
    }

    /// Binds a pre-built boxed handler to `position`.
    pub fn set_boxed(
        &mut self,
        position: usize,
        handler: BoxedHandler<AutocompleteRequest>,
    ) -> RegistrationResult<()> {
        let slot = self.slots.get_mut(position).ok_or(
            RegistrationError::AutocompletePositionOutOfRange {
                position,
                capacity: AUTOCOMPLETE_CAPACITY,
            },
        )?;
        *slot = Some(handler);
        Ok(())
    }

    /// Returns `true` if `position` has its own handler.
    pub fn is_overridden(&self, position: usize) -> bool {
        matches!(self.slots.get(position), Some(Some(_)))
    }

    /// Returns the positions that have their own handler.
    pub fn overridden_positions(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect()
    }

    /// Returns the handler for `position`, falling back to the default.
    ///
    /// Returns `None` only when `position` is past the capacity.
    pub fn handler_at(&self, position: usize) -> Option<BoxedHandler<AutocompleteRequest>> {
        self.slots
            .get(position)
            .map(|slot| slot.clone().unwrap_or_else(|| Arc::clone(&FALLBACK)))
    }
}

impl std::fmt::Debug for AutocompleteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteTable")
            .field("overridden", &self.overridden_positions())
            .finish()
    }
}

/// Outcome of resolving an autocomplete request against a command.
pub enum AutocompleteResolution {
    /// The focused option sits at `index` and that slot has its own handler.
    Overridden {
        index: usize,
        handler: BoxedHandler<AutocompleteRequest>,
    },
    /// The focused option sits at `index`, which uses the default handler.
    Fallback {
        index: usize,
        handler: BoxedHandler<AutocompleteRequest>,
    },
    /// The focused option sits past the table capacity.
    OutOfRange { index: usize },
    /// The focused option is not declared in the leaf option list.
    FocusedNotFound,
}

impl std::fmt::Debug for AutocompleteResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overridden { index, .. } => write!(f, "Overridden({index})"),
            Self::Fallback { index, .. } => write!(f, "Fallback({index})"),
            Self::OutOfRange { index } => write!(f, "OutOfRange({index})"),
            Self::FocusedNotFound => write!(f, "FocusedNotFound"),
        }
    }
}

/// Computes the position of the focused option.
///
/// Descends from `options` one level per subcommand segment of the request
/// path, then scans the leaf list in declared order.
pub fn focused_position(options: &[CommandOption], request: &AutocompleteRequest) -> Option<usize> {
    descend(options, request.subcommand_path())
        .iter()
        .position(|option| option.name == request.focused_option)
}

/// Resolves an autocomplete request to the handler bound to its position.
pub fn resolve(
    options: &[CommandOption],
    table: &AutocompleteTable,
    request: &AutocompleteRequest,
) -> AutocompleteResolution {
    let Some(index) = focused_position(options, request) else {
        return AutocompleteResolution::FocusedNotFound;
    };

    match table.handler_at(index) {
        Some(handler) if table.is_overridden(index) => {
            AutocompleteResolution::Overridden { index, handler }
        }
        Some(handler) => AutocompleteResolution::Fallback { index, handler },
        None => AutocompleteResolution::OutOfRange { index },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(path: &str, focused: &str) -> AutocompleteRequest {
        AutocompleteRequest::new(path, None, focused, "")
    }

    fn search_options() -> Vec<CommandOption> {
        vec![
            CommandOption::string("category", "Category").autocomplete(true),
            CommandOption::string("query", "Query").autocomplete(true),
        ]
    }

    #[test]
    fn test_top_level_position() {
        let options = search_options();
        assert_eq!(focused_position(&options, &request("search", "query")), Some(1));
        assert_eq!(focused_position(&options, &request("search", "category")), Some(0));
    }

    #[test]
    fn test_nested_position() {
        let options = vec![CommandOption::subcommand(
            "child",
            "Child",
            [CommandOption::string("x", "X"), CommandOption::string("y", "Y")],
        )];
        assert_eq!(
            focused_position(&options, &request("parent child", "y")),
            Some(1)
        );
    }

    #[test]
    fn test_group_position() {
        let options = vec![CommandOption::group(
            "roles",
            "Role management",
            [CommandOption::subcommand(
                "grant",
                "Grant a role",
                [
                    CommandOption::new("user", "User", switchboard_core::OptionKind::User),
                    CommandOption::string("role", "Role").autocomplete(true),
                ],
            )],
        )];
        assert_eq!(
            focused_position(&options, &request("admin roles grant", "role")),
            Some(1)
        );
    }

    #[test]
    fn test_unknown_focused_option_is_not_position_zero() {
        let options = search_options();
        let table = AutocompleteTable::new();
        let resolution = resolve(&options, &table, &request("search", "missing"));
        assert!(matches!(resolution, AutocompleteResolution::FocusedNotFound));
    }

    #[test]
    fn test_unknown_subcommand_is_not_found() {
        let options = search_options();
        let table = AutocompleteTable::new();
        let resolution = resolve(&options, &table, &request("search nope", "query"));
        assert!(matches!(resolution, AutocompleteResolution::FocusedNotFound));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut table = AutocompleteTable::new();
        let result = table.set(AUTOCOMPLETE_CAPACITY, |_req: Arc<AutocompleteRequest>| async {});
        assert!(matches!(
            result,
            Err(RegistrationError::AutocompletePositionOutOfRange { position: 25, .. })
        ));
        assert!(table.set(AUTOCOMPLETE_CAPACITY - 1, |_req: Arc<AutocompleteRequest>| async {}).is_ok());
        assert_eq!(table.overridden_positions(), vec![AUTOCOMPLETE_CAPACITY - 1]);
    }

    #[test]
    fn test_resolution_past_capacity() {
        let options: Vec<_> = (0..=AUTOCOMPLETE_CAPACITY)
            .map(|i| CommandOption::string(format!("opt{i}"), "Option"))
            .collect();
        let table = AutocompleteTable::new();
        let resolution = resolve(&options, &table, &request("wide", "opt25"));
        assert!(matches!(
            resolution,
            AutocompleteResolution::OutOfRange { index: 25 }
        ));
    }

    #[tokio::test]
    async fn test_overridden_slot_is_invoked() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut table = AutocompleteTable::new();
        table
            .set(1, move |_req: Arc<AutocompleteRequest>| {
                let c = Arc::clone(&counter_clone);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        let options = search_options();
        let req = request("search", "query");
        match resolve(&options, &table, &req) {
            AutocompleteResolution::Overridden { index, handler } => {
                assert_eq!(index, 1);
                handler.call(Arc::new(req.clone())).await;
            }
            other => panic!("unexpected resolution: {other:?}"),
        }

        // Position 0 still goes to the default handler.
        let req = request("search", "category");
        assert!(matches!(
            resolve(&options, &table, &req),
            AutocompleteResolution::Fallback { index: 0, .. }
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
