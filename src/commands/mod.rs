//! # Command System
//!
//! Slash command handling for Discord interactions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Extension-aware registration and dispatch
//! - 1.0.0: Initial modular command structure (handler trait, context, registry)

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

// Re-export the CommandHandler from the handler module
pub use crate::command_handler::CommandHandler;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

// Re-export commonly used items from submodules
pub use slash::{
    create_slash_commands, get_bool_option, get_integer_option, get_string_option,
    get_subcommand, get_user_option, register_global_commands, register_guild_commands,
};
