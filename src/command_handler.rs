//! # Command Handler
//!
//! Dispatch for both command surfaces: slash commands routed through the
//! handler registry (gated by the loaded-extension flags), and owner-only
//! prefix commands for maintenance (extension management, command sync,
//! shutdown).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Extension gating on slash dispatch
//! - 1.0.0: Initial implementation

use anyhow::Result;
use log::{info, warn};
use serenity::builder::CreateComponents;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::commands::slash::register_guild_commands;
use crate::core::constants::EMOJI_NO;
use crate::features::get_extensions;

/// Confirm-view ids for the shutdown prompt
pub const SHUTDOWN_CONFIRM: &str = "confirm_shutdown";
pub const SHUTDOWN_CANCEL: &str = "cancel_shutdown";

/// Routes slash commands to their handlers and prefix commands to the
/// built-in developer command set.
#[derive(Clone)]
pub struct CommandHandler {
    context: Arc<CommandContext>,
    registry: CommandRegistry,
}

impl CommandHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        CommandHandler { context, registry }
    }

    /// Shared context, for wiring the component handler.
    pub fn context(&self) -> Arc<CommandContext> {
        Arc::clone(&self.context)
    }

    // ── slash dispatch ──────────────────────────────────────────────────

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let name = command.data.name.as_str();

        let handler = match self.registry.get(name) {
            Some(handler) => handler,
            None => {
                warn!("[{request_id}] No handler registered for slash command '{name}'");
                command
                    .create_interaction_response(&ctx.http, |r| {
                        r.kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|m| {
                                m.content(format!("{EMOJI_NO} - Unknown command."))
                                    .ephemeral(true)
                            })
                    })
                    .await?;
                return Ok(());
            }
        };

        // Unloaded extensions keep their commands registered with Discord
        // until the next sync, so dispatch has to gate too
        if !self.context.extensions.is_loaded(handler.extension()) {
            command
                .create_interaction_response(&ctx.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|m| {
                            m.content(format!(
                                "{EMOJI_NO} - The `{}` extension is not loaded.",
                                handler.extension()
                            ))
                            .ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        info!(
            "[{request_id}] Dispatching /{name} for user {}",
            command.user.id
        );
        handler.handle(Arc::clone(&self.context), ctx, command).await
    }

    // ── prefix commands ─────────────────────────────────────────────────

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        let bot_id = ctx.cache.current_user_id().0;
        let body = match strip_command_prefix(&msg.content, &self.context.config.prefix, bot_id) {
            Some(body) => body,
            None => return Ok(()),
        };

        let mut tokens = body.split_whitespace();
        let command = match tokens.next() {
            Some(command) => command.to_lowercase(),
            None => return Ok(()),
        };
        let args: Vec<&str> = tokens.collect();

        // Everything on the prefix surface is developer-only
        match command.as_str() {
            "dev" | "sync" | "shutdown" => {
                if !self.context.config.is_owner(msg.author.id.0) {
                    msg.channel_id
                        .say(
                            &ctx.http,
                            format!("{EMOJI_NO} - Only developers can use this command."),
                        )
                        .await?;
                    return Ok(());
                }
            }
            // Unknown prefix commands are ignored, like CommandNotFound
            _ => return Ok(()),
        }

        match command.as_str() {
            "dev" => self.handle_dev(ctx, msg, &args).await,
            "sync" => self.handle_sync(ctx, msg, &args).await,
            "shutdown" => self.handle_shutdown(ctx, msg).await,
            _ => Ok(()),
        }
    }

    /// `dev` group: load/unload/reload extensions, or list subcommands.
    async fn handle_dev(&self, ctx: &Context, msg: &Message, args: &[&str]) -> Result<()> {
        let (subcommand, exts) = match args.split_first() {
            Some((sub, rest)) => (*sub, rest),
            None => {
                msg.channel_id
                    .say(&ctx.http, "Available: `load`, `unload`, `reload`, `list`")
                    .await?;
                return Ok(());
            }
        };

        match subcommand {
            "load" | "l" => {
                for ext in exts {
                    match self.context.extensions.load(ext) {
                        Ok(()) => {
                            msg.channel_id.say(&ctx.http, format!("📥 `{ext}`")).await?;
                        }
                        Err(e) => {
                            msg.channel_id
                                .say(&ctx.http, format!("Error loading {ext}\n```\n{e}\n```"))
                                .await?;
                        }
                    }
                }
                self.resync_after_extension_change(ctx, msg).await?;
            }
            "unload" | "u" => {
                for ext in exts {
                    match self.context.extensions.unload(ext) {
                        Ok(()) => {
                            msg.channel_id.say(&ctx.http, format!("📤 `{ext}`")).await?;
                        }
                        Err(e) => {
                            msg.channel_id
                                .say(&ctx.http, format!("Error unloading {ext}\n```\n{e}\n```"))
                                .await?;
                        }
                    }
                }
                self.resync_after_extension_change(ctx, msg).await?;
            }
            "reload" | "r" => {
                for ext in exts {
                    match self.context.extensions.reload(ext) {
                        Ok(()) => {
                            msg.channel_id.say(&ctx.http, format!("🔄 `{ext}`")).await?;
                        }
                        Err(e) => {
                            msg.channel_id
                                .say(&ctx.http, format!("Error reloading {ext}\n```\n{e}\n```"))
                                .await?;
                        }
                    }
                }
            }
            "list" => {
                let loaded = self.context.extensions.loaded();
                let lines: Vec<String> = get_extensions()
                    .iter()
                    .map(|ext| {
                        let mark = if loaded.contains(&ext.id) { "🟢" } else { "⚪" };
                        format!("{mark} `{}` - {}", ext.id, ext.description)
                    })
                    .collect();
                msg.channel_id.say(&ctx.http, lines.join("\n")).await?;
            }
            _ => {
                msg.channel_id
                    .say(&ctx.http, "Available: `load`, `unload`, `reload`, `list`")
                    .await?;
            }
        }
        Ok(())
    }

    /// Keep Discord's command list in step with the loaded flags. Global
    /// registration is heavily rate limited, so only a configured dev guild
    /// is refreshed eagerly; elsewhere `sync` does it on demand.
    async fn resync_after_extension_change(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if let Some(guild_id) = self.dev_guild_id() {
            register_guild_commands(ctx, guild_id, &self.context.extensions).await?;
        } else if msg.guild_id.is_some() {
            msg.channel_id
                .say(&ctx.http, "Run `sync` to update the command list.")
                .await?;
        }
        Ok(())
    }

    /// `sync` - re-register slash commands. `sync ~` targets the current
    /// guild, bare `sync` registers globally.
    async fn handle_sync(&self, ctx: &Context, msg: &Message, args: &[&str]) -> Result<()> {
        msg.channel_id.say(&ctx.http, "Syncing").await?;

        let commands = crate::commands::slash::create_slash_commands(&self.context.extensions);
        let count = commands.len();

        match args.first() {
            Some(&"~") => {
                let guild_id = match msg.guild_id {
                    Some(guild_id) => guild_id,
                    None => {
                        msg.channel_id
                            .say(&ctx.http, format!("{EMOJI_NO} - `sync ~` only works in a guild."))
                            .await?;
                        return Ok(());
                    }
                };
                register_guild_commands(ctx, guild_id, &self.context.extensions).await?;
                msg.channel_id
                    .say(&ctx.http, format!("Synced {count} commands to the current guild."))
                    .await?;
            }
            _ => {
                crate::commands::slash::register_global_commands(ctx, &self.context.extensions)
                    .await?;
                msg.channel_id
                    .say(&ctx.http, format!("Synced {count} commands globally"))
                    .await?;
            }
        }
        Ok(())
    }

    /// `shutdown` - confirm view, handled by the component handler.
    async fn handle_shutdown(&self, ctx: &Context, msg: &Message) -> Result<()> {
        msg.channel_id
            .send_message(&ctx.http, |message| {
                message
                    .content("Are you sure you want to shutdown the bot?")
                    .set_components(create_shutdown_buttons())
            })
            .await?;
        Ok(())
    }

    fn dev_guild_id(&self) -> Option<serenity::model::id::GuildId> {
        self.context
            .config
            .discord_guild_id
            .as_ref()
            .and_then(|id| id.parse::<u64>().ok())
            .map(serenity::model::id::GuildId)
    }
}

/// Confirm/deny pair for the shutdown prompt.
fn create_shutdown_buttons() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|btn| {
                btn.custom_id(SHUTDOWN_CONFIRM)
                    .emoji('✅')
                    .style(ButtonStyle::Success)
            })
            .create_button(|btn| {
                btn.custom_id(SHUTDOWN_CANCEL)
                    .emoji('✖')
                    .style(ButtonStyle::Danger)
            })
        })
        .to_owned()
}

/// Strip the textual prefix (case-insensitive) or a leading bot mention.
/// Returns the command body with leading whitespace removed.
pub(crate) fn strip_command_prefix<'a>(
    content: &'a str,
    prefix: &str,
    bot_id: u64,
) -> Option<&'a str> {
    let content = content.trim_start();

    for mention in [format!("<@{bot_id}>"), format!("<@!{bot_id}>")] {
        if let Some(rest) = content.strip_prefix(&mention) {
            return Some(rest.trim_start());
        }
    }

    if content.len() >= prefix.len() && content[..prefix.len()].eq_ignore_ascii_case(prefix) {
        return Some(content[prefix.len()..].trim_start());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: u64 = 42;

    #[test]
    fn test_strip_textual_prefix_case_insensitive() {
        assert_eq!(strip_command_prefix("orbyt dev list", "orbyt ", BOT), Some("dev list"));
        assert_eq!(strip_command_prefix("Orbyt dev list", "orbyt ", BOT), Some("dev list"));
        assert_eq!(strip_command_prefix("ORBYT  sync", "orbyt ", BOT), Some("sync"));
    }

    #[test]
    fn test_strip_mention_prefix() {
        assert_eq!(strip_command_prefix("<@42> shutdown", "orbyt ", BOT), Some("shutdown"));
        assert_eq!(strip_command_prefix("<@!42>   dev", "orbyt ", BOT), Some("dev"));
    }

    #[test]
    fn test_non_prefixed_content_ignored() {
        assert_eq!(strip_command_prefix("hello there", "orbyt ", BOT), None);
        assert_eq!(strip_command_prefix("<@99> dev", "orbyt ", BOT), None);
        assert_eq!(strip_command_prefix("orbytdev", "orbyt ", BOT), None);
    }

    #[test]
    fn test_shutdown_buttons_build() {
        let _components = create_shutdown_buttons();
    }
}
