//! # Slash Commands
//!
//! Discord native slash command definitions and registration.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Registration follows the loaded-extension flags
//! - 1.0.0: Reorganized into per-extension definition modules

pub mod embed;
pub mod festive;
pub mod games;
pub mod info;
pub mod tags;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

use crate::features::extensions::ExtensionManager;

/// Creates the slash command definitions of every loaded extension
pub fn create_slash_commands(extensions: &ExtensionManager) -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    if extensions.is_loaded("info") {
        commands.extend(info::create_commands());
    }
    if extensions.is_loaded("tags") {
        commands.extend(tags::create_commands());
    }
    if extensions.is_loaded("embed") {
        commands.extend(embed::create_commands());
    }
    if extensions.is_loaded("festive") {
        commands.extend(festive::create_commands());
    }
    if extensions.is_loaded("games") {
        commands.extend(games::create_commands());
    }

    commands
}

/// Registers the loaded extensions' commands globally
pub async fn register_global_commands(ctx: &Context, extensions: &ExtensionManager) -> Result<()> {
    let slash_commands = create_slash_commands(extensions);
    let count = slash_commands.len();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers the loaded extensions' commands for a specific guild (instant
/// updates; used during development and after extension reloads)
pub async fn register_guild_commands(
    ctx: &Context,
    guild_id: GuildId,
    extensions: &ExtensionManager,
) -> Result<()> {
    let slash_commands = create_slash_commands(extensions);
    let count = slash_commands.len();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Utility function to get boolean option from slash command
pub fn get_bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}

/// Utility function to get a user option's id from slash command
pub fn get_user_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

/// Split a grouped command into its invoked subcommand and that subcommand's
/// options. Returns None for commands without subcommands.
pub fn get_subcommand(options: &[CommandDataOption]) -> Option<(&str, &[CommandDataOption])> {
    options
        .first()
        .map(|sub| (sub.name.as_str(), sub.options.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slash_commands_all_loaded() {
        let extensions = ExtensionManager::new();
        let commands = create_slash_commands(&extensions);

        let names: Vec<String> = commands
            .iter()
            .map(|c| {
                c.0.get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        assert!(names.contains(&"ping".to_string()));
        assert!(names.contains(&"tag".to_string()));
        assert!(names.contains(&"embed-builder".to_string()));
        assert!(names.contains(&"card".to_string()));
        assert!(names.contains(&"trivia".to_string()));
    }

    #[test]
    fn test_create_slash_commands_skips_unloaded() {
        let extensions = ExtensionManager::new();
        extensions.unload("games").unwrap();
        let commands = create_slash_commands(&extensions);

        let names: Vec<String> = commands
            .iter()
            .map(|c| {
                c.0.get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();

        assert!(!names.contains(&"trivia".to_string()));
        assert!(names.contains(&"ping".to_string()));
    }
}
