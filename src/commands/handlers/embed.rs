//! Embed builder command handler
//!
//! Handles: embed-builder. The command posts an illustrated help embed with
//! the builder button grid; everything after that runs through the message
//! component handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.6.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::core::constants::CONTRAST_COLOR;
use crate::features::embed_builder::{
    active_builders, create_builder_components, BuilderSession, EmbedDraft,
};

/// Handler for the embed builder
pub struct EmbedHandler;

#[async_trait]
impl SlashCommandHandler for EmbedHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["embed-builder"]
    }

    fn extension(&self) -> &'static str {
        "embed"
    }

    async fn handle(
        &self,
        _ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .set_embed(generate_help_embed())
                            .set_components(create_builder_components(&EmbedDraft::default()))
                    })
            })
            .await?;

        let message = command.get_interaction_response(&serenity_ctx.http).await?;
        active_builders().insert(message.id.0, BuilderSession::new(command.user.id.0));

        info!(
            "Embed builder opened by {} (message {})",
            command.user.id, message.id
        );
        Ok(())
    }
}

/// The illustrated example embed shown when the builder opens and via Help.
pub fn generate_help_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("Title")
        .url("http://example.com/orbyt")
        .description(
            "This is the _description_ of the embed.\n\
             Descriptions can be upto **4000** characters long.\n\
             There is a shared limit of **6000** characters (including fields) for the embed.\n\
             Note that the description can be __split into multiple lines.__\n",
        )
        .color(CONTRAST_COLOR)
        .author(|a| {
            a.name("<< Author Icon | Author Name")
                .url("http://example.com/orbyt")
                .icon_url("https://i.imgur.com/JNMmc4Z.png")
        })
        .footer(|f| {
            f.text("<< Footer Icon | This is the footer")
                .icon_url("https://i.imgur.com/Vpkgtg0.png")
        })
        .image("https://i.imgur.com/PIKTqHy.png")
        .thumbnail("https://i.imgur.com/f4sXljr.png");

    for i in 1..3 {
        embed.field(
            format!("Field {i}"),
            format!("Field {i} Value\nIt's Inline"),
            true,
        );
    }
    embed.field("Field 3", "Field 3 Value\nIt's NOT Inline", false);
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_handler_metadata() {
        let handler = EmbedHandler;
        assert_eq!(handler.command_names(), &["embed-builder"]);
        assert_eq!(handler.extension(), "embed");
    }

    #[test]
    fn test_generate_help_embed_builds() {
        let embed = generate_help_embed();
        let fields = embed.0.get("fields").unwrap().as_array().unwrap();
        assert_eq!(fields.len(), 3);
    }
}
