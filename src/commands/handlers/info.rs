//! Info command handlers
//!
//! Handles: ping
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::builder::CreateEmbed;
use serenity::client::bridge::gateway::ShardId;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::core::constants::{EMOJI_NETWORK, GREEN};
use crate::ShardManagerContainer;

/// Handler for info commands: ping
pub struct InfoHandler;

#[async_trait]
impl SlashCommandHandler for InfoHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["ping"]
    }

    fn extension(&self) -> &'static str {
        "info"
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "ping" => self.handle_ping(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl InfoHandler {
    /// Handle /ping - report gateway latency, then patch in the measured
    /// round-trip once the first response has landed.
    async fn handle_ping(
        &self,
        _ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let user_id = command.user.id.to_string();
        let started = Instant::now();

        let api_latency = gateway_latency(serenity_ctx).await;
        let mut description = match api_latency {
            Some(latency) => format!(
                "{EMOJI_NETWORK} **API Latency:** {}ms",
                latency.as_millis()
            ),
            None => format!("{EMOJI_NETWORK} **API Latency:** measuring..."),
        };

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.set_embed(pong_embed(&description))
                    })
            })
            .await?;

        let round_trip = started.elapsed();
        description.push_str(&format!(
            "\n{EMOJI_NETWORK} **Round Trip Latency:** {}ms",
            round_trip.as_millis()
        ));

        command
            .edit_original_interaction_response(&serenity_ctx.http, |message| {
                message.set_embed(pong_embed(&description))
            })
            .await?;

        info!("Ping command completed for user {user_id}");
        Ok(())
    }
}

fn pong_embed(description: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("Pong!").color(GREEN).description(description);
    embed
}

/// Current shard's heartbeat latency, when the shard runner has measured one.
async fn gateway_latency(serenity_ctx: &Context) -> Option<Duration> {
    let shard_manager = {
        let data = serenity_ctx.data.read().await;
        data.get::<ShardManagerContainer>()?.clone()
    };

    let manager = shard_manager.lock().await;
    let runners = manager.runners.lock().await;
    runners
        .get(&ShardId(serenity_ctx.shard_id))
        .and_then(|runner| runner.latency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_handler_commands() {
        let handler = InfoHandler;
        assert_eq!(handler.command_names(), &["ping"]);
        assert_eq!(handler.extension(), "info");
    }

    #[test]
    fn test_pong_embed_builds() {
        let _embed = pong_embed("latency line");
    }
}
