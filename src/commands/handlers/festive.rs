//! Festive command handlers
//!
//! Handles the `/card` group. Cards render off the event loop, preview
//! ephemerally, and are delivered by the component handler on confirmation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.4.0
//!
//! ## Changelog
//! - 1.0.0: Christmas card command with per-user cooldown

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use serenity::builder::CreateComponents;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::AttachmentType;
use serenity::model::id::UserId;
use serenity::prelude::Context;
use std::borrow::Cow;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_string_option, get_subcommand, get_user_option};
use crate::core::constants::EMOJI_NO;
use crate::features::cards::{
    pending_cards, pick_greeting, CardColor, PendingCard, CARD_CANCEL, CARD_CONFIRM,
};

/// Handler for the /card command group
pub struct FestiveHandler;

#[async_trait]
impl SlashCommandHandler for FestiveHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["card"]
    }

    fn extension(&self) -> &'static str {
        "festive"
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let (subcommand, options) = match get_subcommand(&command.data.options) {
            Some(parts) => parts,
            None => return Ok(()),
        };

        match subcommand {
            "christmas" => self.handle_christmas(&ctx, serenity_ctx, command, options).await,
            _ => Ok(()),
        }
    }
}

impl FestiveHandler {
    async fn handle_christmas(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        options: &[serenity::model::application::interaction::application_command::CommandDataOption],
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let user_id = command.user.id.0;

        let guild_id = match command.guild_id {
            Some(guild_id) => guild_id,
            None => {
                return reply_ephemeral(
                    serenity_ctx,
                    command,
                    &format!("{EMOJI_NO} - This command cannot be used in direct messages!"),
                )
                .await;
            }
        };

        let recipient_id = get_user_option(options, "user")
            .ok_or_else(|| anyhow!("missing user parameter"))?;
        let recipient = command
            .data
            .resolved
            .users
            .get(&UserId(recipient_id))
            .cloned()
            .ok_or_else(|| anyhow!("user {recipient_id} missing from resolved data"))?;

        if recipient.bot {
            return reply_ephemeral(
                serenity_ctx,
                command,
                &format!("{EMOJI_NO} - You cannot send a card to a bot."),
            )
            .await;
        }
        if recipient.id == command.user.id {
            return reply_ephemeral(
                serenity_ctx,
                command,
                "😔 - Well thats sad, but you cannot send cards to yourself.\n\
                 **Merry Christmas & Happy Holidays from Team Orbyt**",
            )
            .await;
        }

        // Owners are exempt from the card cooldown
        if !ctx.config.is_owner(user_id) {
            if let Err(remaining) = ctx.cooldowns.try_acquire("card", user_id) {
                return reply_ephemeral(
                    serenity_ctx,
                    command,
                    &format!(
                        "⏰ - Command is on cooldown! Try again in {}s.",
                        remaining.as_secs().max(1)
                    ),
                )
                .await;
            }
        }

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                    .interaction_response_data(|message| message.ephemeral(true))
            })
            .await?;

        let color = CardColor::from_option(get_string_option(options, "color").as_deref());
        let author_name = command.user.name.clone();
        let recipient_name = recipient.name.clone();
        let greeting = pick_greeting();

        let renderer = ctx.cards.clone();
        let png = tokio::task::spawn_blocking(move || {
            renderer.render(&author_name, &recipient_name, greeting, color)
        })
        .await??;

        info!(
            "[{request_id}] Rendered {} card ({} bytes) from {} to {}",
            color.as_str(),
            png.len(),
            command.user.id,
            recipient.id
        );

        let guild_name = guild_id
            .name(&serenity_ctx.cache)
            .unwrap_or_else(|| "this server".to_string());
        let jump_url = format!(
            "https://discord.com/channels/{}/{}",
            guild_id.0, command.channel_id.0
        );

        let preview = command
            .create_followup_message(&serenity_ctx.http, |message| {
                message
                    .content("🎁 - Here is your card! Is this OK? (Preview)")
                    .add_file(AttachmentType::Bytes {
                        data: Cow::Owned(png.clone()),
                        filename: "card.png".to_string(),
                    })
                    .ephemeral(true)
                    .set_components(create_card_confirm_buttons())
            })
            .await?;

        pending_cards().insert(
            preview.id.0,
            PendingCard::new(
                png,
                user_id,
                command.user.name.clone(),
                recipient.id.0,
                guild_name,
                jump_url,
            ),
        );
        Ok(())
    }
}

/// Send-to-user / cancel pair under the card preview.
fn create_card_confirm_buttons() -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|btn| {
                btn.custom_id(CARD_CONFIRM)
                    .label("Send to User")
                    .emoji('✅')
                    .style(ButtonStyle::Success)
            })
            .create_button(|btn| {
                btn.custom_id(CARD_CANCEL)
                    .emoji('✖')
                    .style(ButtonStyle::Danger)
            })
        })
        .to_owned()
}

async fn reply_ephemeral(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_festive_handler_metadata() {
        let handler = FestiveHandler;
        assert_eq!(handler.command_names(), &["card"]);
        assert_eq!(handler.extension(), "festive");
    }

    #[test]
    fn test_confirm_buttons_build() {
        let _components = create_card_confirm_buttons();
    }
}
