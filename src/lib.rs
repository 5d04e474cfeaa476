//! # Orbyt
//!
//! A quality-of-life multipurpose Discord bot: slash and prefix commands
//! organized into loadable extensions, interactive message components, and a
//! SQLite-backed tag store.

// Core layer - configuration, constants, text utilities
pub mod core;

// Infrastructure - SQLite persistence
pub mod database;

// Features layer - extension registry and feature modules
pub mod features;

// UI components - buttons, selects, modals
pub mod message_components;

// Application layer
pub mod command_handler;
pub mod commands;

pub use crate::core::Config;
pub use database::Database;
pub use features::{get_bot_version, ExtensionManager};

use serenity::client::bridge::gateway::ShardManager;
use serenity::prelude::{Mutex, TypeMapKey};
use std::sync::Arc;

/// Shard manager handle stored in the client data map, for gateway latency
/// reads (/ping) and the owner shutdown command.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<Mutex<ShardManager>>;
}
