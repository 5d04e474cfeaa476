//! Tag command handlers
//!
//! Handles the `/tag` group: add, view, remove, list, edit. Creation and
//! editing go through modals; the submissions are processed by the message
//! component handler.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::component::InputTextStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_bool_option, get_string_option, get_subcommand};
use crate::core::constants::{EMOJI_NO, EMOJI_YES};
use crate::core::response::escape_markdown;
use crate::features::pagination::{active_paginators, create_paginator_buttons, PaginatorSession};

/// Modal id for tag creation
pub const TAG_ADD_MODAL: &str = "tag_add_modal";
/// Modal id prefix for tag edits; carries `:{bypass}:{name}` after the prefix
pub const TAG_EDIT_MODAL: &str = "tag_edit_modal";

/// Handler for the /tag command group
pub struct TagsHandler;

#[async_trait]
impl SlashCommandHandler for TagsHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["tag"]
    }

    fn extension(&self) -> &'static str {
        "tags"
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();

        let guild_id = match command.guild_id {
            Some(guild_id) => guild_id,
            None => {
                command
                    .create_interaction_response(&serenity_ctx.http, |r| {
                        r.kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|m| {
                                m.content(format!(
                                    "{EMOJI_NO} - This command cannot be used in direct messages!"
                                ))
                                .ephemeral(true)
                            })
                    })
                    .await?;
                return Ok(());
            }
        };

        let (subcommand, options) = match get_subcommand(&command.data.options) {
            Some(parts) => parts,
            None => return Ok(()),
        };

        match subcommand {
            "add" => self.handle_add(serenity_ctx, command).await,
            "view" => {
                self.handle_view(&ctx, serenity_ctx, command, guild_id.0 as i64, options)
                    .await
            }
            "remove" => {
                self.handle_remove(
                    &ctx,
                    serenity_ctx,
                    command,
                    guild_id.0 as i64,
                    options,
                    request_id,
                )
                .await
            }
            "list" => {
                self.handle_list(&ctx, serenity_ctx, command, guild_id.0 as i64)
                    .await
            }
            "edit" => {
                self.handle_edit(&ctx, serenity_ctx, command, guild_id.0 as i64, options)
                    .await
            }
            _ => Ok(()),
        }
    }
}

impl TagsHandler {
    /// Handle /tag add - open the creation modal
    async fn handle_add(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(TAG_ADD_MODAL)
                            .title("Add Tag")
                            .components(|components| {
                                components
                                    .create_action_row(|row| {
                                        row.create_input_text(|input| {
                                            input
                                                .custom_id("tag_name")
                                                .label("Tag Name")
                                                .placeholder("Enter the name of the tag")
                                                .style(InputTextStyle::Short)
                                                .required(true)
                                                .max_length(50)
                                        })
                                    })
                                    .create_action_row(|row| {
                                        row.create_input_text(|input| {
                                            input
                                                .custom_id("tag_content")
                                                .label("Tag Content")
                                                .placeholder("Enter the content of the tag")
                                                .style(InputTextStyle::Paragraph)
                                                .required(true)
                                                .max_length(2000)
                                        })
                                    })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    /// Handle /tag view
    async fn handle_view(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        guild_id: i64,
        options: &[serenity::model::application::interaction::application_command::CommandDataOption],
    ) -> Result<()> {
        let name = get_string_option(options, "name").unwrap_or_default();
        let raw = get_bool_option(options, "raw").unwrap_or(false);

        let tag = match ctx.database.get_tag(guild_id, &name).await? {
            Some(tag) => tag,
            None => return reply_tag_not_found(serenity_ctx, command, &name).await,
        };

        let content = if raw {
            escape_markdown(&tag.content)
        } else {
            tag.content
        };

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| m.content(content))
            })
            .await?;
        Ok(())
    }

    /// Handle /tag remove
    async fn handle_remove(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        guild_id: i64,
        options: &[serenity::model::application::interaction::application_command::CommandDataOption],
        request_id: Uuid,
    ) -> Result<()> {
        let name = get_string_option(options, "name").unwrap_or_default();
        let user_id = command.user.id.0;
        let bypass = ctx.can_moderate_tags(
            command.member.as_ref().and_then(|m| m.permissions),
            user_id,
        );

        let tag = match ctx.database.get_tag(guild_id, &name).await? {
            Some(tag) => tag,
            None => return reply_tag_not_found(serenity_ctx, command, &name).await,
        };

        if !bypass && tag.author != user_id as i64 {
            command
                .create_interaction_response(&serenity_ctx.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|m| {
                            m.content(format!(
                                "{EMOJI_NO} - You can only remove your own tags"
                            ))
                            .ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        let author_filter = if bypass { None } else { Some(user_id as i64) };
        ctx.database.delete_tag(guild_id, &name, author_filter).await?;

        let marker = if bypass && tag.author != user_id as i64 {
            " [ Moderator Permission ]"
        } else {
            ""
        };
        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| {
                        m.content(format!("{EMOJI_YES} - Tag `{name}` removed{marker}"))
                    })
            })
            .await?;

        info!("[{request_id}] Tag `{name}` removed from guild {guild_id} by {user_id}");
        Ok(())
    }

    /// Handle /tag list - paginated name/id listing
    async fn handle_list(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        guild_id: i64,
    ) -> Result<()> {
        let tags = ctx.database.list_tags(guild_id).await?;

        if tags.is_empty() {
            command
                .create_interaction_response(&serenity_ctx.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|m| {
                            m.content(format!("{EMOJI_NO} - No tags found")).ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        let guild_name = command
            .guild_id
            .and_then(|id| id.name(&serenity_ctx.cache))
            .unwrap_or_else(|| "this server".to_string());

        let entries: Vec<String> = tags
            .iter()
            .map(|tag| format!("{} (ID: {})", escape_markdown(&tag.name), tag.id))
            .collect();

        let session = PaginatorSession::new(
            format!("Tags in {guild_name}"),
            entries,
            10,
            false,
            command.user.id.0,
        );

        command
            .create_interaction_response(&serenity_ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| {
                        m.set_embed(session.render())
                            .set_components(create_paginator_buttons())
                    })
            })
            .await?;

        let message = command.get_interaction_response(&serenity_ctx.http).await?;
        active_paginators().insert(message.id.0, session);
        Ok(())
    }

    /// Handle /tag edit - authorization check, then open the edit modal
    async fn handle_edit(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        guild_id: i64,
        options: &[serenity::model::application::interaction::application_command::CommandDataOption],
    ) -> Result<()> {
        let name = get_string_option(options, "name").unwrap_or_default();
        let user_id = command.user.id.0;
        let bypass = ctx.can_moderate_tags(
            command.member.as_ref().and_then(|m| m.permissions),
            user_id,
        );

        let tag = match ctx.database.get_tag(guild_id, &name).await? {
            Some(tag) => tag,
            None => return reply_tag_not_found(serenity_ctx, command, &name).await,
        };

        if !bypass && tag.author != user_id as i64 {
            command
                .create_interaction_response(&serenity_ctx.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|m| {
                            m.content(format!(
                                "{EMOJI_NO} - You don't have permission to edit this tag"
                            ))
                            .ephemeral(true)
                        })
                })
                .await?;
            return Ok(());
        }

        // Moderator edits skip the author filter on the eventual UPDATE
        let moderator_edit = bypass && tag.author != user_id as i64;
        let modal_id = format!(
            "{}:{}:{}",
            TAG_EDIT_MODAL,
            if moderator_edit { '1' } else { '0' },
            tag.name
        );

        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal.custom_id(modal_id).title("Edit Tag").components(|components| {
                            components.create_action_row(|row| {
                                row.create_input_text(|input| {
                                    input
                                        .custom_id("tag_content")
                                        .label("Tag Content")
                                        .placeholder("Enter the content of the tag")
                                        .style(InputTextStyle::Paragraph)
                                        .required(true)
                                        .max_length(2000)
                                })
                            })
                        })
                    })
            })
            .await?;
        Ok(())
    }
}

async fn reply_tag_not_found(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    name: &str,
) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.content(format!("{EMOJI_NO} - Tag `{name}` not found"))
                        .ephemeral(true)
                })
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_handler_metadata() {
        let handler = TagsHandler;
        assert_eq!(handler.command_names(), &["tag"]);
        assert_eq!(handler.extension(), "tags");
    }

    #[test]
    fn test_edit_modal_id_round_trips() {
        let modal_id = format!("{}:{}:{}", TAG_EDIT_MODAL, '1', "my-tag");
        let rest = modal_id.strip_prefix("tag_edit_modal:").unwrap();
        let (bypass, name) = rest.split_once(':').unwrap();
        assert_eq!(bypass, "1");
        assert_eq!(name, "my-tag");
    }
}
