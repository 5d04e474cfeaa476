//! Slash command handler trait
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Handlers declare their owning extension for load gating
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use super::context::CommandContext;

/// Trait for slash command handlers
///
/// Each handler processes the commands of one extension. Handlers are
/// registered with a CommandRegistry and dispatched by command name; dispatch
/// is skipped while the owning extension is unloaded.
///
/// # Example
///
/// ```ignore
/// pub struct InfoHandler;
///
/// #[async_trait]
/// impl SlashCommandHandler for InfoHandler {
///     fn command_names(&self) -> &'static [&'static str] {
///         &["ping"]
///     }
///
///     fn extension(&self) -> &'static str {
///         "info"
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<CommandContext>,
///         serenity_ctx: &Context,
///         command: &ApplicationCommandInteraction,
///     ) -> Result<()> {
///         // Handle ping command
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SlashCommandHandler: Send + Sync {
    /// Command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    /// Id of the extension this handler belongs to
    ///
    /// Must match an entry in the extension descriptor table.
    fn extension(&self) -> &'static str;

    /// Handle the slash command
    ///
    /// # Arguments
    ///
    /// * `ctx` - Shared command context with database, sessions, etc.
    /// * `serenity_ctx` - Serenity context for Discord API calls
    /// * `command` - The slash command interaction to handle
    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe (can be used with dyn)
    #[test]
    fn test_trait_is_object_safe() {
        fn assert_object_safe(_: &dyn SlashCommandHandler) {}

        struct Dummy;

        #[async_trait]
        impl SlashCommandHandler for Dummy {
            fn command_names(&self) -> &'static [&'static str] {
                &["dummy"]
            }

            fn extension(&self) -> &'static str {
                "info"
            }

            async fn handle(
                &self,
                _ctx: Arc<CommandContext>,
                _serenity_ctx: &Context,
                _command: &ApplicationCommandInteraction,
            ) -> Result<()> {
                Ok(())
            }
        }

        assert_object_safe(&Dummy);
    }
}
