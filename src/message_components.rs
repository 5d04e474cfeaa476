//! # Message Components
//!
//! Routing for buttons, select menus and modal submissions. Interactive state
//! lives in per-feature session maps keyed by message id; every route checks
//! the invoking user against the session author and lazily expires stale
//! sessions. Session lookups never hold a map guard across an await.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.2.0: Trivia setup and answer routing
//! - 1.1.0: Embed builder buttons, selects and modals
//! - 1.0.0: Paginator and confirm/cancel routing

use anyhow::Result;
use log::{info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::{ActionRowComponent, ButtonStyle, InputTextStyle};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::modal::ModalSubmitInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::{AttachmentType, Channel, ChannelType};
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::model::webhook::Webhook;
use serenity::prelude::Context;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::command_handler::{SHUTDOWN_CANCEL, SHUTDOWN_CONFIRM};
use crate::commands::context::CommandContext;
use crate::commands::handlers::embed::generate_help_embed;
use crate::commands::handlers::tags::{TAG_ADD_MODAL, TAG_EDIT_MODAL};
use crate::core::constants::{CONTRAST_COLOR, EMOJI_NO, EMOJI_YES, GREEN, YELLOW};
use crate::core::response::{escape_markdown, truncate};
use crate::features::cards::{pending_cards, pick_festive_emoji, CARD_CANCEL, CARD_CONFIRM};
use crate::features::embed_builder::{
    self as eb, active_builders, create_builder_components, EmbedField,
};
use crate::features::pagination::{
    active_paginators, create_disabled_paginator_buttons, PAGE_NEXT, PAGE_PREV, PAGE_STOP,
};
use crate::features::trivia::{
    active_rounds, active_setups, create_answer_buttons, create_setup_components, TriviaRound,
    TRIVIA_ANSWER_PREFIX, TRIVIA_CATEGORY_SELECT, TRIVIA_DIFFICULTY_SELECT, TRIVIA_START,
};
use crate::ShardManagerContainer;

/// Handler for all message component interactions
pub struct MessageComponentHandler {
    context: Arc<CommandContext>,
}

/// Outcome of a synchronous session-map operation, resolved before awaiting.
enum SessionOutcome<T> {
    Missing,
    Expired,
    NotAuthor,
    Ready(T),
}

impl MessageComponentHandler {
    pub fn new(context: Arc<CommandContext>) -> Self {
        Self { context }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = interaction.data.custom_id.clone();
        let user_id = interaction.user.id.to_string();

        info!("Processing component interaction: {custom_id} from user: {user_id}");

        match custom_id.as_str() {
            PAGE_PREV | PAGE_STOP | PAGE_NEXT => {
                self.handle_pagination(ctx, interaction).await?;
            }
            SHUTDOWN_CONFIRM => {
                self.handle_shutdown_confirm(ctx, interaction).await?;
            }
            SHUTDOWN_CANCEL => {
                self.handle_shutdown_cancel(ctx, interaction).await?;
            }
            CARD_CONFIRM => {
                self.handle_card_confirm(ctx, interaction).await?;
            }
            CARD_CANCEL => {
                self.handle_card_cancel(ctx, interaction).await?;
            }
            TRIVIA_CATEGORY_SELECT | TRIVIA_DIFFICULTY_SELECT => {
                self.handle_trivia_select(ctx, interaction).await?;
            }
            TRIVIA_START => {
                self.handle_trivia_start(ctx, interaction).await?;
            }
            id if id.starts_with(TRIVIA_ANSWER_PREFIX) => {
                self.handle_trivia_answer(ctx, interaction).await?;
            }
            id if id.starts_with("eb_") => {
                self.handle_builder_component(ctx, interaction).await?;
            }
            _ => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown component interaction.").ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    /// Handle modal submit interactions
    pub async fn handle_modal_submit(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
    ) -> Result<()> {
        let custom_id = interaction.data.custom_id.clone();
        let user_id = interaction.user.id.to_string();

        info!("Processing modal submit: {custom_id} from user: {user_id}");

        match custom_id.as_str() {
            TAG_ADD_MODAL => {
                self.handle_tag_add_modal(ctx, interaction).await?;
            }
            id if id.starts_with(TAG_EDIT_MODAL) => {
                self.handle_tag_edit_modal(ctx, interaction, id).await?;
            }
            id if id.starts_with("eb_modal_") => {
                self.handle_builder_modal(ctx, interaction, id).await?;
            }
            _ => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown modal submission.").ephemeral(true)
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    // ── pagination ──────────────────────────────────────────────────────

    async fn handle_pagination(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let message_id = interaction.message.id.0;
        let custom_id = interaction.data.custom_id.as_str();
        let user_id = interaction.user.id.0;

        let outcome: SessionOutcome<Option<CreateEmbed>> = {
            let paginators = active_paginators();
            match paginators.get_mut(&message_id) {
                None => SessionOutcome::Missing,
                Some(mut session) => {
                    if session.is_expired() {
                        drop(session);
                        paginators.remove(&message_id);
                        SessionOutcome::Expired
                    } else if session.author_id != user_id {
                        SessionOutcome::NotAuthor
                    } else if custom_id == PAGE_STOP {
                        drop(session);
                        paginators.remove(&message_id);
                        SessionOutcome::Ready(None)
                    } else {
                        session.switch(if custom_id == PAGE_PREV { -1 } else { 1 });
                        SessionOutcome::Ready(Some(session.render()))
                    }
                }
            }
        };

        match outcome {
            SessionOutcome::Missing | SessionOutcome::Expired => {
                self.reply_session_expired(ctx, interaction).await
            }
            SessionOutcome::NotAuthor => self.reply_not_author(ctx, interaction).await,
            SessionOutcome::Ready(None) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message.set_components(create_disabled_paginator_buttons())
                            })
                    })
                    .await?;
                Ok(())
            }
            SessionOutcome::Ready(Some(embed)) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| message.set_embed(embed))
                    })
                    .await?;
                Ok(())
            }
        }
    }

    // ── shutdown confirmation ───────────────────────────────────────────

    async fn handle_shutdown_confirm(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        if !self.context.config.is_owner(interaction.user.id.0) {
            return self.reply_not_author(ctx, interaction).await;
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.content("Shutting Down").components(|c| c)
                    })
            })
            .await?;

        interaction
            .channel_id
            .say(&ctx.http, ":wave: - Goodbye.")
            .await?;

        info!("Shutdown confirmed by owner {}", interaction.user.id);

        let shard_manager = {
            let data = ctx.data.read().await;
            data.get::<ShardManagerContainer>().cloned()
        };
        if let Some(shard_manager) = shard_manager {
            shard_manager.lock().await.shutdown_all().await;
        } else {
            warn!("Shard manager unavailable; exiting without clean shutdown");
            std::process::exit(0);
        }
        Ok(())
    }

    async fn handle_shutdown_cancel(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        if !self.context.config.is_owner(interaction.user.id.0) {
            return self.reply_not_author(ctx, interaction).await;
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.content("Cancelled").components(|c| c)
                    })
            })
            .await?;
        Ok(())
    }

    // ── card delivery ───────────────────────────────────────────────────

    async fn handle_card_confirm(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let message_id = interaction.message.id.0;
        let user_id = interaction.user.id.0;

        let outcome = {
            let cards = pending_cards();
            match cards.get(&message_id) {
                None => SessionOutcome::Missing,
                Some(card) => {
                    if card.is_expired() {
                        drop(card);
                        cards.remove(&message_id);
                        SessionOutcome::Expired
                    } else if card.author_id != user_id {
                        SessionOutcome::NotAuthor
                    } else {
                        drop(card);
                        match cards.remove(&message_id) {
                            Some((_, card)) => SessionOutcome::Ready(card),
                            None => SessionOutcome::Missing,
                        }
                    }
                }
            }
        };

        let card = match outcome {
            SessionOutcome::Missing | SessionOutcome::Expired => {
                return self.reply_session_expired(ctx, interaction).await;
            }
            SessionOutcome::NotAuthor => return self.reply_not_author(ctx, interaction).await,
            SessionOutcome::Ready(card) => card,
        };

        let emoji = pick_festive_emoji();
        let dm_result = async {
            let channel = UserId(card.recipient_id)
                .create_dm_channel(&ctx.http)
                .await?;
            channel
                .send_message(&ctx.http, |message| {
                    message
                        .content(format!(
                            "{emoji} - **@{}** has sent you a card!\n\
                             ||**Tip:** Use `/card christmas` in a mutual server to send a christmas card!||",
                            card.author_name
                        ))
                        .add_file(AttachmentType::Bytes {
                            data: Cow::Owned(card.png.clone()),
                            filename: "card.png".to_string(),
                        })
                        .components(|components| {
                            components.create_action_row(|row| {
                                row.create_button(|button| {
                                    button
                                        .label(format!("Sent from {}", card.guild_name))
                                        .emoji(serenity::model::channel::ReactionType::Unicode(
                                            emoji.to_string(),
                                        ))
                                        .style(ButtonStyle::Link)
                                        .url(&card.jump_url)
                                })
                            })
                        })
                })
                .await?;
            Ok::<(), serenity::Error>(())
        }
        .await;

        match dm_result {
            Ok(()) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "{EMOJI_YES} - The card was sent successfully to <@{}>!",
                                        card.recipient_id
                                    ))
                                    .components(|c| c)
                            })
                    })
                    .await?;
            }
            Err(e) if is_dm_closed(&e) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "{EMOJI_NO} - I cannot send the card to the user because they have DMs disabled.\n\
                                         If you are their friend, download this card and send it manually."
                                    ))
                                    .components(|c| c)
                            })
                    })
                    .await?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn handle_card_cancel(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        pending_cards().remove(&interaction.message.id.0);
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.content("Cancelled").components(|c| c)
                    })
            })
            .await?;
        Ok(())
    }

    // ── trivia ──────────────────────────────────────────────────────────

    async fn handle_trivia_select(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let message_id = interaction.message.id.0;
        let user_id = interaction.user.id.0;
        let selected = interaction.data.values.first().cloned().unwrap_or_default();
        let is_category = interaction.data.custom_id == TRIVIA_CATEGORY_SELECT;

        let outcome: SessionOutcome<CreateComponents> = {
            let setups = active_setups();
            match setups.get_mut(&message_id) {
                None => SessionOutcome::Missing,
                Some(mut setup) => {
                    if setup.is_expired() {
                        drop(setup);
                        setups.remove(&message_id);
                        SessionOutcome::Expired
                    } else if setup.author_id != user_id {
                        SessionOutcome::NotAuthor
                    } else {
                        if is_category {
                            setup.category = selected.parse::<u32>().ok().filter(|&id| id != 0);
                        } else {
                            setup.difficulty =
                                Some(selected.clone()).filter(|d| d != "any" && !d.is_empty());
                        }
                        SessionOutcome::Ready(create_setup_components(&setup))
                    }
                }
            }
        };

        match outcome {
            SessionOutcome::Missing | SessionOutcome::Expired => {
                self.reply_session_expired(ctx, interaction).await
            }
            SessionOutcome::NotAuthor => self.reply_not_author(ctx, interaction).await,
            SessionOutcome::Ready(components) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| message.set_components(components))
                    })
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_trivia_start(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let message_id = interaction.message.id.0;
        let user_id = interaction.user.id.0;

        let outcome = {
            let setups = active_setups();
            match setups.get(&message_id) {
                None => SessionOutcome::Missing,
                Some(setup) => {
                    if setup.is_expired() {
                        drop(setup);
                        setups.remove(&message_id);
                        SessionOutcome::Expired
                    } else if setup.author_id != user_id {
                        SessionOutcome::NotAuthor
                    } else {
                        drop(setup);
                        match setups.remove(&message_id) {
                            Some((_, setup)) => SessionOutcome::Ready(setup),
                            None => SessionOutcome::Missing,
                        }
                    }
                }
            }
        };

        let setup = match outcome {
            SessionOutcome::Missing | SessionOutcome::Expired => {
                return self.reply_session_expired(ctx, interaction).await;
            }
            SessionOutcome::NotAuthor => return self.reply_not_author(ctx, interaction).await,
            SessionOutcome::Ready(setup) => setup,
        };

        // Question fetch goes to the network; acknowledge the press first
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredUpdateMessage)
            })
            .await?;

        let questions = match self
            .context
            .trivia
            .questions(setup.amount, setup.category, setup.difficulty.as_deref())
            .await
        {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) | Err(_) => {
                interaction
                    .edit_original_interaction_response(&ctx.http, |message| {
                        message
                            .content(format!(
                                "{EMOJI_NO} - Couldn't fetch questions for **{}**. Try another category.",
                                setup.category_name()
                            ))
                            .components(|c| c)
                    })
                    .await?;
                return Ok(());
            }
        };

        let round = TriviaRound::new(user_id, questions);
        let embed = round.render();
        let buttons = create_answer_buttons(round.current());

        interaction
            .edit_original_interaction_response(&ctx.http, |message| {
                message
                    .content("🎯 - Good luck!")
                    .set_embed(embed)
                    .set_components(buttons)
            })
            .await?;

        active_rounds().insert(message_id, round);
        Ok(())
    }

    async fn handle_trivia_answer(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let message_id = interaction.message.id.0;
        let user_id = interaction.user.id.0;
        let choice: usize = interaction
            .data
            .custom_id
            .strip_prefix(TRIVIA_ANSWER_PREFIX)
            .and_then(|s| s.parse().ok())
            .unwrap_or(usize::MAX);

        struct AnswerRender {
            feedback: String,
            embed: CreateEmbed,
            buttons: Option<CreateComponents>,
        }

        let outcome: SessionOutcome<AnswerRender> = {
            let rounds = active_rounds();
            match rounds.get_mut(&message_id) {
                None => SessionOutcome::Missing,
                Some(mut round) => {
                    if round.is_expired() {
                        drop(round);
                        rounds.remove(&message_id);
                        SessionOutcome::Expired
                    } else if round.author_id != user_id {
                        SessionOutcome::NotAuthor
                    } else {
                        let answer = round.answer(choice);
                        let feedback = if answer.correct {
                            format!("{EMOJI_YES} - Correct!")
                        } else {
                            format!(
                                "{EMOJI_NO} - Wrong! The answer was **{}**.",
                                answer.correct_text
                            )
                        };

                        if answer.finished {
                            let render = AnswerRender {
                                feedback,
                                embed: round.render_final(),
                                buttons: None,
                            };
                            drop(round);
                            rounds.remove(&message_id);
                            SessionOutcome::Ready(render)
                        } else {
                            SessionOutcome::Ready(AnswerRender {
                                feedback,
                                embed: round.render(),
                                buttons: Some(create_answer_buttons(round.current())),
                            })
                        }
                    }
                }
            }
        };

        match outcome {
            SessionOutcome::Missing | SessionOutcome::Expired => {
                self.reply_session_expired(ctx, interaction).await
            }
            SessionOutcome::NotAuthor => self.reply_not_author(ctx, interaction).await,
            SessionOutcome::Ready(render) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message.content(render.feedback).set_embed(render.embed);
                                match render.buttons {
                                    Some(buttons) => message.set_components(buttons),
                                    None => message.components(|c| c),
                                }
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }

    // ── embed builder: buttons and selects ──────────────────────────────

    async fn handle_builder_component(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let custom_id = interaction.data.custom_id.clone();
        let (action, builder_id) = match custom_id.split_once(':') {
            // Selects on ephemeral helper messages carry the builder id
            Some((action, id)) => (action, id.parse::<u64>().unwrap_or(0)),
            None => (custom_id.as_str(), interaction.message.id.0),
        };

        // Author and liveness gate shared by every builder route
        enum Gate {
            Missing,
            NotAuthor,
            Ok,
        }
        let gate = {
            let builders = active_builders();
            match builders.get(&builder_id) {
                None => Gate::Missing,
                Some(session) => {
                    if session.is_expired() {
                        drop(session);
                        builders.remove(&builder_id);
                        Gate::Missing
                    } else if session.author_id != interaction.user.id.0 {
                        Gate::NotAuthor
                    } else {
                        Gate::Ok
                    }
                }
            }
        };
        match gate {
            Gate::Missing => return self.reply_session_expired(ctx, interaction).await,
            Gate::NotAuthor => return self.reply_not_author(ctx, interaction).await,
            Gate::Ok => {}
        }

        match action {
            eb::EB_EDIT_EMBED => self.show_embed_modal(ctx, interaction, builder_id).await,
            eb::EB_EDIT_AUTHOR => self.show_author_modal(ctx, interaction, builder_id).await,
            eb::EB_EDIT_FOOTER => self.show_footer_modal(ctx, interaction, builder_id).await,
            eb::EB_EDIT_URL => self.show_url_modal(ctx, interaction, builder_id).await,
            eb::EB_FIELD_ADD => self.show_field_add_modal(ctx, interaction, builder_id).await,
            eb::EB_FIELD_DELETE => {
                self.show_field_select(ctx, interaction, builder_id, true).await
            }
            eb::EB_FIELD_EDIT => {
                self.show_field_select(ctx, interaction, builder_id, false).await
            }
            eb::EB_SELECT_FIELD_DELETE => {
                self.handle_field_delete_select(ctx, interaction, builder_id).await
            }
            eb::EB_SELECT_FIELD_EDIT => {
                self.show_field_edit_modal(ctx, interaction, builder_id).await
            }
            eb::EB_SEND_CHANNEL => self.show_channel_select(ctx, interaction, builder_id).await,
            eb::EB_SELECT_CHANNEL => {
                self.handle_channel_send(ctx, interaction, builder_id).await
            }
            eb::EB_SEND_WEBHOOK => self.show_webhook_modal(ctx, interaction, builder_id).await,
            eb::EB_SEND_DM => self.handle_dm_send(ctx, interaction, builder_id).await,
            eb::EB_HELP => self.handle_builder_help(ctx, interaction).await,
            eb::EB_EXPORT => self.handle_export(ctx, interaction, builder_id).await,
            eb::EB_CANCEL => self.handle_builder_cancel(ctx, interaction, builder_id).await,
            _ => Ok(()),
        }
    }

    async fn show_embed_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };

        let color_default = draft.color.map(|c| {
            format!("rgb({}, {}, {})", (c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
        });

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_EMBED))
                            .title("Edit Embed Components")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("em_title")
                                            .label("Title")
                                            .placeholder("The title of the embed")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(256)
                                            .value(draft.title.clone().unwrap_or_default())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("description")
                                            .label("Description")
                                            .placeholder(
                                                "Upto 4000 characters. Out of shared max characters (6000)",
                                            )
                                            .style(InputTextStyle::Paragraph)
                                            .required(false)
                                            .max_length(4000)
                                            .value(draft.description.clone().unwrap_or_default())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("image")
                                            .label("Image URL")
                                            .placeholder("http://example.com/space.png")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(draft.image_url.clone().unwrap_or_default())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("thumbnail")
                                            .label("Thumbnail URL")
                                            .placeholder("http://example.com/stars.png")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(draft.thumbnail_url.clone().unwrap_or_default())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("color")
                                            .label("Color")
                                            .placeholder("Hex #FFFFFF | rgb(r, g, b)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(color_default.unwrap_or_default())
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_author_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        let author = draft.author.clone().unwrap_or_default();

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_AUTHOR))
                            .title("Edit Author Component")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("author_name")
                                            .label("Author Name")
                                            .placeholder("The name of the author")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(256)
                                            .value(author.name.clone())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("author_url")
                                            .label("Author URL")
                                            .placeholder("http://example.com")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(author.url.clone().unwrap_or_default())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("author_icon_url")
                                            .label("Author Icon URL")
                                            .placeholder("http://example.com/astronaut.png")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(author.icon_url.clone().unwrap_or_default())
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_footer_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        let footer = draft.footer.clone().unwrap_or_default();

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_FOOTER))
                            .title("Edit Footer Component")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("footer_text")
                                            .label("Footer Text")
                                            .placeholder("The text of the footer")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(2048)
                                            .value(footer.text.clone())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("footer_icon_url")
                                            .label("Footer Icon URL")
                                            .placeholder("http://example.com/astronaut.png")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(footer.icon_url.clone().unwrap_or_default())
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_url_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_URL))
                            .title("Edit URL Component")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("url")
                                            .label("Title URL")
                                            .placeholder("http://example.com")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .value(draft.url.clone().unwrap_or_default())
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_field_add_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.fields.len() >= eb::MAX_FIELDS {
            return self
                .reply_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - Embed reached maximum of {} fields.", eb::MAX_FIELDS),
                )
                .await;
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_FIELD_ADD))
                            .title("Add Field")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_name")
                                            .label("Field Name")
                                            .placeholder("The name of the field")
                                            .style(InputTextStyle::Short)
                                            .required(true)
                                            .max_length(256)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_value")
                                            .label("Field Value")
                                            .placeholder("The value of the field")
                                            .style(InputTextStyle::Paragraph)
                                            .required(true)
                                            .max_length(1024)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_inline")
                                            .label("Inline?")
                                            .placeholder("True/False | T/F || Yes/No | Y/N (default: True)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(5)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_index")
                                            .label("Index (Where to add the field)")
                                            .placeholder("1 - 25 (default: 25)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(2)
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    /// Field picker for delete (`deleting == true`) or edit.
    async fn show_field_select(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
        deleting: bool,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.fields.is_empty() {
            let verb = if deleting { "delete" } else { "edit" };
            return self
                .reply_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - There are no fields to {verb}."),
                )
                .await;
        }

        let (select_id, prompt) = if deleting {
            (eb::EB_SELECT_FIELD_DELETE, "➖ - Choose a field to delete:")
        } else {
            (eb::EB_SELECT_FIELD_EDIT, "📝 - Choose a field to edit:")
        };

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.content(prompt).ephemeral(true).components(|components| {
                            components.create_action_row(|row| {
                                row.create_select_menu(|menu| {
                                    menu.custom_id(format!("{select_id}:{builder_id}"))
                                        .placeholder("Select a field")
                                        .min_values(1)
                                        .max_values(1)
                                        .options(|options| {
                                            for (i, field) in draft.fields.iter().enumerate() {
                                                options.create_option(|opt| {
                                                    opt.label(truncate(
                                                        &format!("{}. {}", i + 1, field.name),
                                                        100,
                                                    ))
                                                    .value(i.to_string())
                                                });
                                            }
                                            options
                                        })
                                })
                            })
                        })
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_field_delete_select(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let index: usize = interaction
            .data
            .values
            .first()
            .and_then(|v| v.parse().ok())
            .unwrap_or(usize::MAX);

        let refresh = {
            let builders = active_builders();
            match builders.get_mut(&builder_id) {
                None => None,
                Some(mut session) => {
                    session.draft.remove_field(index);
                    Some((
                        session.draft.to_create_embed(),
                        create_builder_components(&session.draft),
                    ))
                }
            }
        };

        let Some((embed, components)) = refresh else {
            return self.reply_session_expired(ctx, interaction).await;
        };

        interaction
            .channel_id
            .edit_message(&ctx.http, MessageId(builder_id), |message| {
                message.set_embed(embed).set_components(components)
            })
            .await?;

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message
                            .content(format!("{EMOJI_YES} - Field deleted."))
                            .components(|c| c)
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_field_edit_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let index: usize = interaction
            .data
            .values
            .first()
            .and_then(|v| v.parse().ok())
            .unwrap_or(usize::MAX);

        let field = match self
            .draft_snapshot(builder_id)
            .and_then(|draft| draft.fields.get(index).cloned())
        {
            Some(field) => field,
            None => return self.reply_session_expired(ctx, interaction).await,
        };

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!(
                                "{}:{builder_id}:{index}",
                                eb::EB_MODAL_FIELD_EDIT
                            ))
                            .title(format!("Editing Field {}", index + 1))
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_name")
                                            .label("Field Name")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(256)
                                            .value(field.name.clone())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_value")
                                            .label("Field Value")
                                            .style(InputTextStyle::Paragraph)
                                            .required(false)
                                            .max_length(1024)
                                            .value(field.value.clone())
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_inline")
                                            .label("Inline?")
                                            .placeholder("True/False | T/F || Yes/No | Y/N")
                                            .style(InputTextStyle::Short)
                                            .required(true)
                                            .max_length(5)
                                            .value(if field.inline { "True" } else { "False" })
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("fl_index")
                                            .label("Index (Where to move the field)")
                                            .placeholder("1 - 25")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(2)
                                            .value((index + 1).to_string())
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn show_channel_select(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.is_empty() {
            return self
                .reply_ephemeral(ctx, interaction, &format!("{EMOJI_NO} - Embed is empty!"))
                .await;
        }

        let guild_id = match interaction.guild_id {
            Some(guild_id) => guild_id,
            None => {
                return self
                    .reply_ephemeral(
                        ctx,
                        interaction,
                        &format!("{EMOJI_NO} - Channel sending only works in a server."),
                    )
                    .await;
            }
        };

        // String selects top out at 25 options; prefer the highest channels
        let mut channels: Vec<(u64, String, i64)> = guild_id
            .to_guild_cached(&ctx.cache)
            .map(|guild| {
                guild
                    .channels
                    .iter()
                    .filter_map(|(channel_id, channel)| match channel {
                        Channel::Guild(gc)
                            if matches!(gc.kind, ChannelType::Text | ChannelType::News) =>
                        {
                            Some((channel_id.0, gc.name.clone(), gc.position))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        channels.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.1.cmp(&b.1)));
        channels.truncate(25);

        if channels.is_empty() {
            return self
                .reply_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - No text channels available."),
                )
                .await;
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content("📨 - Choose a channel to send the embed to:")
                            .ephemeral(true)
                            .components(|components| {
                                components.create_action_row(|row| {
                                    row.create_select_menu(|menu| {
                                        menu.custom_id(format!(
                                            "{}:{builder_id}",
                                            eb::EB_SELECT_CHANNEL
                                        ))
                                        .placeholder("Select a channel.")
                                        .min_values(1)
                                        .max_values(1)
                                        .options(|options| {
                                            for (id, name, _) in &channels {
                                                options.create_option(|opt| {
                                                    opt.label(truncate(&format!("#{name}"), 100))
                                                        .value(id.to_string())
                                                });
                                            }
                                            options
                                        })
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_channel_send(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let channel_id = ChannelId(
            interaction
                .data
                .values
                .first()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        );

        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };

        // The *user* needs send/embed permission in the target, not the bot alone
        let user_can_send = ctx
            .cache
            .guild_channel(channel_id)
            .and_then(|channel| {
                channel
                    .permissions_for_user(&ctx.cache, interaction.user.id)
                    .ok()
            })
            .map(|perms| perms.send_messages() && perms.embed_links())
            .unwrap_or(false);

        if !user_can_send {
            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|message| {
                            message
                                .content(format!(
                                    "{EMOJI_NO} - You don't have permission to send embeds in <#{channel_id}>."
                                ))
                                .components(|c| c)
                        })
                })
                .await?;
            return Ok(());
        }

        match channel_id
            .send_message(&ctx.http, |message| message.set_embed(draft.to_create_embed()))
            .await
        {
            Ok(sent) => {
                let jump_url = sent.link();
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "{EMOJI_YES} - Embed sent to <#{channel_id}>."
                                    ))
                                    .components(|components| {
                                        components.create_action_row(|row| {
                                            row.create_button(|button| {
                                                button
                                                    .label("Jump to Message")
                                                    .style(ButtonStyle::Link)
                                                    .url(&jump_url)
                                            })
                                        })
                                    })
                            })
                    })
                    .await?;
            }
            Err(e) => {
                warn!("Embed channel send failed: {e}");
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!(
                                        "{EMOJI_NO} - Couldn't send the embed in <#{channel_id}>."
                                    ))
                                    .components(|c| c)
                            })
                    })
                    .await?;
            }
        }
        Ok(())
    }

    async fn show_webhook_modal(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.is_empty() {
            return self
                .reply_ephemeral(ctx, interaction, &format!("{EMOJI_NO} - Embed is empty!"))
                .await;
        }

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|modal| {
                        modal
                            .custom_id(format!("{}:{builder_id}", eb::EB_MODAL_WEBHOOK))
                            .title("Send Embed via Webhook")
                            .components(|c| {
                                c.create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("wh_url")
                                            .label("Webhook URL")
                                            .placeholder("Webhook URL")
                                            .style(InputTextStyle::Short)
                                            .required(true)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("wh_name")
                                            .label("Webhook Name")
                                            .placeholder("Name to send message under (optional)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                            .max_length(80)
                                    })
                                })
                                .create_action_row(|row| {
                                    row.create_input_text(|input| {
                                        input
                                            .custom_id("wh_avatar")
                                            .label("Webhook Avatar URL")
                                            .placeholder("Avatar of the Webhook (optional)")
                                            .style(InputTextStyle::Short)
                                            .required(false)
                                    })
                                })
                            })
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_dm_send(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.is_empty() {
            return self
                .reply_ephemeral(ctx, interaction, &format!("{EMOJI_NO} - Embed is empty!"))
                .await;
        }

        let dm_result = async {
            let channel = interaction.user.create_dm_channel(&ctx.http).await?;
            channel
                .send_message(&ctx.http, |message| {
                    message.set_embed(draft.to_create_embed())
                })
                .await
        }
        .await;

        match dm_result {
            Ok(sent) => {
                let jump_url = sent.link();
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!("{EMOJI_YES} - Embed sent to DM."))
                                    .ephemeral(true)
                                    .components(|components| {
                                        components.create_action_row(|row| {
                                            row.create_button(|button| {
                                                button
                                                    .label("Jump to Message")
                                                    .style(ButtonStyle::Link)
                                                    .url(&jump_url)
                                            })
                                        })
                                    })
                            })
                    })
                    .await?;
            }
            Err(_) => {
                self.reply_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - Couldn't send the embed to you via DM."),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn handle_builder_help(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        let mut help = generate_help_embed();
        help.field(
            "Fields",
            "➕: Add a Field\n➖: Delete a Field\n📝: Edit a field (or reorder)",
            false,
        );
        help.color(CONTRAST_COLOR);

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message.set_embed(help).ephemeral(true)
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_export(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => return self.reply_session_expired(ctx, interaction).await,
        };
        if draft.is_empty() {
            return self
                .reply_ephemeral(ctx, interaction, &format!("{EMOJI_NO} - Embed is empty!"))
                .await;
        }

        let json = serde_json::to_string_pretty(&draft.to_json_value())?;

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredUpdateMessage)
            })
            .await?;
        interaction
            .create_followup_message(&ctx.http, |message| {
                message
                    .content("Here's your Embed as a JSON file:")
                    .ephemeral(true)
                    .add_file(AttachmentType::Bytes {
                        data: Cow::Owned(json.into_bytes()),
                        filename: "embed.json".to_string(),
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_builder_cancel(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        builder_id: u64,
    ) -> Result<()> {
        active_builders().remove(&builder_id);
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::UpdateMessage)
                    .interaction_response_data(|message| {
                        message.content("Embed builder closed.").components(|c| c)
                    })
            })
            .await?;
        Ok(())
    }

    // ── embed builder: modal submissions ────────────────────────────────

    async fn handle_builder_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        custom_id: &str,
    ) -> Result<()> {
        let mut parts = custom_id.split(':');
        let action = parts.next().unwrap_or_default().to_string();
        let builder_id: u64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let field_index: Option<usize> = parts.next().and_then(|s| s.parse().ok());

        let inputs = modal_inputs(interaction);

        if action == eb::EB_MODAL_WEBHOOK {
            return self.handle_webhook_modal(ctx, interaction, builder_id, &inputs).await;
        }

        /// What the modal submission resolved to, computed under the map guard.
        enum ModalOutcome {
            Missing,
            /// User-facing validation failure
            Invalid(String),
            /// Commit on the builder message itself
            Update(CreateEmbed, CreateComponents),
            /// Commit reached from an ephemeral helper (field edit)
            UpdateRemote(CreateEmbed, CreateComponents),
        }

        let outcome = {
            let builders = active_builders();
            match builders.get_mut(&builder_id) {
                None => ModalOutcome::Missing,
                Some(mut session) => {
                    if session.author_id != interaction.user.id.0 {
                        ModalOutcome::Invalid(format!(
                            "{EMOJI_NO} - Only the author can respond to this"
                        ))
                    } else {
                        let mut candidate = session.draft.clone();
                        let remote = action == eb::EB_MODAL_FIELD_EDIT;

                        let applied: Result<(), String> = match action.as_str() {
                            eb::EB_MODAL_EMBED => candidate.set_basic(
                                inputs.get("em_title").map(String::as_str).unwrap_or(""),
                                inputs.get("description").map(String::as_str).unwrap_or(""),
                                inputs.get("image").map(String::as_str).unwrap_or(""),
                                inputs.get("thumbnail").map(String::as_str).unwrap_or(""),
                                inputs.get("color").map(String::as_str).unwrap_or(""),
                            ),
                            eb::EB_MODAL_AUTHOR => {
                                candidate.set_author(
                                    inputs.get("author_name").map(String::as_str).unwrap_or(""),
                                    inputs.get("author_url").map(String::as_str).unwrap_or(""),
                                    inputs
                                        .get("author_icon_url")
                                        .map(String::as_str)
                                        .unwrap_or(""),
                                );
                                Ok(())
                            }
                            eb::EB_MODAL_FOOTER => {
                                candidate.set_footer(
                                    inputs.get("footer_text").map(String::as_str).unwrap_or(""),
                                    inputs
                                        .get("footer_icon_url")
                                        .map(String::as_str)
                                        .unwrap_or(""),
                                );
                                Ok(())
                            }
                            eb::EB_MODAL_URL => candidate
                                .set_url(inputs.get("url").map(String::as_str).unwrap_or("")),
                            eb::EB_MODAL_FIELD_ADD => {
                                apply_field_add(&mut candidate, &inputs)
                            }
                            eb::EB_MODAL_FIELD_EDIT => {
                                apply_field_edit(&mut candidate, &inputs, field_index)
                            }
                            _ => Err("Unknown modal submission.".to_string()),
                        };

                        match applied {
                            Err(reason) => ModalOutcome::Invalid(format!("{EMOJI_NO} - {reason}")),
                            Ok(()) if !candidate.fits_budget() => ModalOutcome::Invalid(format!(
                                "{EMOJI_NO} - Embed too long; Exceeded {} characters.",
                                eb::MAX_TOTAL_CHARS
                            )),
                            Ok(()) => {
                                session.draft = candidate;
                                let embed = session.draft.to_create_embed();
                                let components = create_builder_components(&session.draft);
                                if remote {
                                    ModalOutcome::UpdateRemote(embed, components)
                                } else {
                                    ModalOutcome::Update(embed, components)
                                }
                            }
                        }
                    }
                }
            }
        };

        match outcome {
            ModalOutcome::Missing => {
                self.reply_modal_ephemeral(ctx, interaction, "This embed builder has expired.")
                    .await
            }
            ModalOutcome::Invalid(reason) => {
                self.reply_modal_ephemeral(ctx, interaction, &reason).await
            }
            ModalOutcome::Update(embed, components) => {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message.set_embed(embed).set_components(components)
                            })
                    })
                    .await?;
                Ok(())
            }
            ModalOutcome::UpdateRemote(embed, components) => {
                interaction
                    .channel_id
                    .edit_message(&ctx.http, MessageId(builder_id), |message| {
                        message.set_embed(embed).set_components(components)
                    })
                    .await?;
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::UpdateMessage)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!("{EMOJI_YES} - Field edited."))
                                    .components(|c| c)
                            })
                    })
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_webhook_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        builder_id: u64,
        inputs: &HashMap<String, String>,
    ) -> Result<()> {
        let url = inputs.get("wh_url").cloned().unwrap_or_default();
        if !eb::is_discord_webhook_url(&url) {
            return self
                .reply_modal_ephemeral(ctx, interaction, &format!("{EMOJI_NO} - Invalid URL"))
                .await;
        }

        let draft = match self.draft_snapshot(builder_id) {
            Some(draft) => draft,
            None => {
                return self
                    .reply_modal_ephemeral(ctx, interaction, "This embed builder has expired.")
                    .await;
            }
        };

        let send_result = async {
            let webhook = Webhook::from_url(&ctx.http, &url).await?;
            webhook
                .execute(&ctx.http, true, |message| {
                    if let Some(name) = inputs.get("wh_name").filter(|n| !n.is_empty()) {
                        message.username(name);
                    }
                    if let Some(avatar) = inputs.get("wh_avatar").filter(|a| !a.is_empty()) {
                        message.avatar_url(avatar);
                    }
                    message.embeds(vec![draft.to_json_value()])
                })
                .await
        }
        .await;

        match send_result {
            Ok(sent) => {
                let jump_url = sent.map(|m| m.link());
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content(format!("{EMOJI_YES} - Embed sent via webhook."))
                                    .ephemeral(true);
                                if let Some(url) = jump_url {
                                    message.components(|components| {
                                        components.create_action_row(|row| {
                                            row.create_button(|button| {
                                                button
                                                    .label("Jump to Message")
                                                    .style(ButtonStyle::Link)
                                                    .url(&url)
                                            })
                                        })
                                    });
                                }
                                message
                            })
                    })
                    .await?;
            }
            Err(e) => {
                warn!("Webhook send failed: {e}");
                self.reply_modal_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - Couldn't send the embed."),
                )
                .await?;
            }
        }
        Ok(())
    }

    // ── tag modals ──────────────────────────────────────────────────────

    async fn handle_tag_add_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
    ) -> Result<()> {
        let inputs = modal_inputs(interaction);
        let name = inputs.get("tag_name").cloned().unwrap_or_default();
        let content = inputs.get("tag_content").cloned().unwrap_or_default();

        let guild_id = match interaction.guild_id {
            Some(guild_id) => guild_id.0 as i64,
            None => return Ok(()),
        };

        if self.context.database.get_tag(guild_id, &name).await?.is_some() {
            return self
                .reply_modal_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - Tag `{name}` already exists"),
                )
                .await;
        }

        let created_at = chrono::Utc::now().timestamp();
        self.context
            .database
            .create_tag(
                guild_id,
                interaction.user.id.0 as i64,
                &name,
                &content,
                created_at,
            )
            .await?;

        let mut embed = CreateEmbed::default();
        embed
            .description(escape_markdown(&content))
            .color(GREEN)
            .field(
                "Tag created at:",
                format!("<t:{created_at}:F> (<t:{created_at}:R>)"),
                false,
            );

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(format!("{EMOJI_YES} - Tag `{name}` added"))
                            .set_embed(embed)
                    })
            })
            .await?;
        Ok(())
    }

    async fn handle_tag_edit_modal(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        custom_id: &str,
    ) -> Result<()> {
        // custom_id layout: tag_edit_modal:{bypass}:{name}
        let rest = custom_id.strip_prefix(TAG_EDIT_MODAL).unwrap_or_default();
        let rest = rest.strip_prefix(':').unwrap_or_default();
        let (bypass_flag, name) = rest.split_once(':').unwrap_or(("0", ""));
        let moderator_edit = bypass_flag == "1";

        let inputs = modal_inputs(interaction);
        let content = inputs.get("tag_content").cloned().unwrap_or_default();

        let guild_id = match interaction.guild_id {
            Some(guild_id) => guild_id.0 as i64,
            None => return Ok(()),
        };

        let author_filter = if moderator_edit {
            None
        } else {
            Some(interaction.user.id.0 as i64)
        };

        let changed = self
            .context
            .database
            .update_tag_content(guild_id, name, &content, author_filter)
            .await?;

        if changed == 0 {
            return self
                .reply_modal_ephemeral(
                    ctx,
                    interaction,
                    &format!("{EMOJI_NO} - Tag `{name}` not found"),
                )
                .await;
        }

        let marker = if moderator_edit {
            " [ Moderator Permissions ]"
        } else {
            ""
        };
        let mut embed = CreateEmbed::default();
        embed.description(&content).color(YELLOW);

        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .content(format!("{EMOJI_YES} - Tag `{name}` edited{marker}"))
                            .set_embed(embed)
                    })
            })
            .await?;
        Ok(())
    }

    // ── shared helpers ──────────────────────────────────────────────────

    /// Snapshot of a live builder draft, or None when the session is gone.
    fn draft_snapshot(&self, builder_id: u64) -> Option<eb::EmbedDraft> {
        active_builders()
            .get(&builder_id)
            .map(|session| session.draft.clone())
    }

    async fn reply_ephemeral(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
        content: &str,
    ) -> Result<()> {
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(content).ephemeral(true))
            })
            .await?;
        Ok(())
    }

    async fn reply_modal_ephemeral(
        &self,
        ctx: &Context,
        interaction: &ModalSubmitInteraction,
        content: &str,
    ) -> Result<()> {
        interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(content).ephemeral(true))
            })
            .await?;
        Ok(())
    }

    async fn reply_not_author(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        self.reply_ephemeral(
            ctx,
            interaction,
            &format!("{EMOJI_NO} - Only the author can respond to this"),
        )
        .await
    }

    async fn reply_session_expired(
        &self,
        ctx: &Context,
        interaction: &MessageComponentInteraction,
    ) -> Result<()> {
        self.reply_ephemeral(ctx, interaction, "This view has expired.").await
    }
}

/// Collect the text inputs of a modal submission into a custom_id -> value map.
fn modal_inputs(interaction: &ModalSubmitInteraction) -> HashMap<String, String> {
    let mut inputs = HashMap::new();
    for row in &interaction.data.components {
        for component in &row.components {
            if let ActionRowComponent::InputText(input) = component {
                inputs.insert(input.custom_id.clone(), input.value.clone());
            }
        }
    }
    inputs
}

/// Parse the free-form inline answer used by the field modals.
fn parse_inline(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" => Some(true),
        "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn apply_field_add(
    draft: &mut eb::EmbedDraft,
    inputs: &HashMap<String, String>,
) -> Result<(), String> {
    let name = inputs.get("fl_name").cloned().unwrap_or_default();
    let value = inputs.get("fl_value").cloned().unwrap_or_default();

    let inline = match inputs.get("fl_inline").map(String::as_str).unwrap_or("") {
        "" => true,
        raw => parse_inline(raw).ok_or("Inline value must be Boolean!")?,
    };

    let index = match inputs.get("fl_index").map(String::as_str).unwrap_or("") {
        "" => draft.fields.len(),
        raw => raw
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or("Index out of range.")?,
    };

    draft.insert_field(index, EmbedField { name, value, inline })
}

fn apply_field_edit(
    draft: &mut eb::EmbedDraft,
    inputs: &HashMap<String, String>,
    old_index: Option<usize>,
) -> Result<(), String> {
    let old_index = old_index.ok_or("Index out of range.")?;
    let name = inputs.get("fl_name").cloned().unwrap_or_default();
    let value = inputs.get("fl_value").cloned().unwrap_or_default();

    let inline = parse_inline(inputs.get("fl_inline").map(String::as_str).unwrap_or(""))
        .ok_or("Inline value must be Boolean!")?;

    let new_index = match inputs.get("fl_index").map(String::as_str).unwrap_or("") {
        "" => old_index,
        raw => raw
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or("Index out of range.")?,
    };

    draft.move_field(old_index, new_index, EmbedField { name, value, inline })
}

/// Discord error 50007: cannot send messages to this user.
fn is_dm_closed(error: &serenity::Error) -> bool {
    if let serenity::Error::Http(http_error) = error {
        if let serenity::http::HttpError::UnsuccessfulRequest(response) = &**http_error {
            return response.error.code == 50007;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline() {
        assert_eq!(parse_inline("True"), Some(true));
        assert_eq!(parse_inline("y"), Some(true));
        assert_eq!(parse_inline("NO"), Some(false));
        assert_eq!(parse_inline("f"), Some(false));
        assert_eq!(parse_inline("maybe"), None);
        assert_eq!(parse_inline(""), None);
    }

    #[test]
    fn test_apply_field_add_defaults() {
        let mut draft = eb::EmbedDraft::default();
        let inputs: HashMap<String, String> = [
            ("fl_name".to_string(), "Name".to_string()),
            ("fl_value".to_string(), "Value".to_string()),
        ]
        .into_iter()
        .collect();

        apply_field_add(&mut draft, &inputs).unwrap();
        assert_eq!(draft.fields.len(), 1);
        assert!(draft.fields[0].inline);
    }

    #[test]
    fn test_apply_field_add_rejects_bad_inline() {
        let mut draft = eb::EmbedDraft::default();
        let inputs: HashMap<String, String> = [
            ("fl_name".to_string(), "Name".to_string()),
            ("fl_value".to_string(), "Value".to_string()),
            ("fl_inline".to_string(), "perhaps".to_string()),
        ]
        .into_iter()
        .collect();

        assert!(apply_field_add(&mut draft, &inputs).is_err());
    }

    #[test]
    fn test_apply_field_add_one_based_index() {
        let mut draft = eb::EmbedDraft::default();
        for (name, index) in [("first", ""), ("second", ""), ("inserted", "2")] {
            let mut inputs: HashMap<String, String> = [
                ("fl_name".to_string(), name.to_string()),
                ("fl_value".to_string(), "v".to_string()),
            ]
            .into_iter()
            .collect();
            if !index.is_empty() {
                inputs.insert("fl_index".to_string(), index.to_string());
            }
            apply_field_add(&mut draft, &inputs).unwrap();
        }

        let names: Vec<_> = draft.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["first", "inserted", "second"]);
    }

    #[test]
    fn test_apply_field_edit_requires_inline() {
        let mut draft = eb::EmbedDraft::default();
        draft
            .insert_field(
                0,
                EmbedField {
                    name: "a".to_string(),
                    value: "1".to_string(),
                    inline: true,
                },
            )
            .unwrap();

        let inputs: HashMap<String, String> = [
            ("fl_name".to_string(), "a".to_string()),
            ("fl_value".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        assert!(apply_field_edit(&mut draft, &inputs, Some(0)).is_err());
    }

    #[test]
    fn test_apply_field_edit_moves() {
        let mut draft = eb::EmbedDraft::default();
        for name in ["a", "b", "c"] {
            draft
                .insert_field(
                    usize::MAX,
                    EmbedField {
                        name: name.to_string(),
                        value: "v".to_string(),
                        inline: true,
                    },
                )
                .unwrap();
        }

        let inputs: HashMap<String, String> = [
            ("fl_name".to_string(), "c-edited".to_string()),
            ("fl_value".to_string(), "v".to_string()),
            ("fl_inline".to_string(), "no".to_string()),
            ("fl_index".to_string(), "1".to_string()),
        ]
        .into_iter()
        .collect();

        apply_field_edit(&mut draft, &inputs, Some(2)).unwrap();
        let names: Vec<_> = draft.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c-edited", "a", "b"]);
        assert!(!draft.fields[0].inline);
    }
}
