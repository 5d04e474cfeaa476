//! Games command handlers
//!
//! Handles: trivia. The command fetches the category list and posts the round
//! setup message; selection and the round itself run through the message
//! component handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.3.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_integer_option;
use crate::core::constants::EMOJI_NO;
use crate::features::trivia::{active_setups, create_setup_components, TriviaSetup};

/// Handler for the games extension: trivia
pub struct GamesHandler;

#[async_trait]
impl SlashCommandHandler for GamesHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["trivia"]
    }

    fn extension(&self) -> &'static str {
        "games"
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let amount = get_integer_option(&command.data.options, "questions")
            .unwrap_or(5)
            .clamp(1, 10) as u8;

        // The category fetch can be slow; defer before hitting the API
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;

        let categories = match ctx.trivia.categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!("[{request_id}] Trivia category fetch failed: {e}");
                command
                    .edit_original_interaction_response(&serenity_ctx.http, |message| {
                        message.content(format!(
                            "{EMOJI_NO} - The trivia service is unavailable right now, try again later."
                        ))
                    })
                    .await?;
                return Ok(());
            }
        };

        let setup = TriviaSetup::new(command.user.id.0, amount, categories);

        command
            .edit_original_interaction_response(&serenity_ctx.http, |message| {
                message
                    .content(format!(
                        "🎲 - Set up your trivia round ({amount} questions):"
                    ))
                    .set_components(create_setup_components(&setup))
            })
            .await?;

        let message = command.get_interaction_response(&serenity_ctx.http).await?;
        active_setups().insert(message.id.0, setup);

        info!("[{request_id}] Trivia setup posted for user {}", command.user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_handler_metadata() {
        let handler = GamesHandler;
        assert_eq!(handler.command_names(), &["trivia"]);
        assert_eq!(handler.extension(), "games");
    }
}
