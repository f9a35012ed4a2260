//! The platform client seam.
//!
//! Switchboard never talks to the network itself. Everything it needs from the
//! chat platform is the bulk-overwrite RPC exposed through [`Platform`]; event
//! delivery happens the other way round, with the client pushing
//! [`InteractionEvent`](crate::event::InteractionEvent)s into the runtime.

use std::sync::Arc;

use async_trait::async_trait;

use crate::descriptor::{CommandDescriptor, RegisteredCommand};
use crate::error::PlatformResult;
use crate::scope::Scope;

/// A connected platform client.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Returns the platform name, used in logs.
    fn name(&self) -> &str;

    /// Replaces every command registered in `scope` with `commands`.
    ///
    /// This is a full replace: commands registered before and missing from
    /// `commands` are deleted by the platform.
    ///
    /// # Returns
    ///
    /// The commands as registered, carrying their platform-assigned ids.
    async fn overwrite_commands(
        &self,
        scope: Scope,
        commands: Vec<CommandDescriptor>,
    ) -> PlatformResult<Vec<RegisteredCommand>>;
}

/// A shared platform trait object.
pub type BoxedPlatform = Arc<dyn Platform>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CommandId;
    use crate::error::PlatformError;

    struct EchoPlatform;

    #[async_trait]
    impl Platform for EchoPlatform {
        fn name(&self) -> &str {
            "echo"
        }

        async fn overwrite_commands(
            &self,
            _scope: Scope,
            commands: Vec<CommandDescriptor>,
        ) -> PlatformResult<Vec<RegisteredCommand>> {
            Ok(commands
                .into_iter()
                .enumerate()
                .map(|(i, c)| RegisteredCommand {
                    id: CommandId(i as u64),
                    name: c.name,
                    kind: c.kind,
                })
                .collect())
        }
    }

    struct OfflinePlatform;

    #[async_trait]
    impl Platform for OfflinePlatform {
        fn name(&self) -> &str {
            "offline"
        }

        async fn overwrite_commands(
            &self,
            _scope: Scope,
            _commands: Vec<CommandDescriptor>,
        ) -> PlatformResult<Vec<RegisteredCommand>> {
            Err(PlatformError::NotConnected)
        }
    }

    #[tokio::test]
    async fn test_overwrite_returns_ids() {
        let platform: BoxedPlatform = Arc::new(EchoPlatform);
        let registered = platform
            .overwrite_commands(
                Scope::Global,
                vec![CommandDescriptor {
                    name: "ping".into(),
                    description: "Ping".into(),
                    kind: crate::kind::CommandKind::Slash,
                    options: vec![],
                }],
            )
            .await
            .unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].id, CommandId(0));
    }

    #[tokio::test]
    async fn test_overwrite_failure_names_platform() {
        let platforms: Vec<BoxedPlatform> = vec![Arc::new(EchoPlatform), Arc::new(OfflinePlatform)];
        let names: Vec<_> = platforms.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["echo", "offline"]);

        let err = platforms[1]
            .overwrite_commands(Scope::Scoped(crate::scope::ScopeId(1)), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotConnected));
    }
}
