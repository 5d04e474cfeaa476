use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use orbyt::command_handler::CommandHandler;
use orbyt::commands::slash::{register_global_commands, register_guild_commands};
use orbyt::core::response::spaced_padding;
use orbyt::core::Config;
use orbyt::database::Database;
use orbyt::message_components::MessageComponentHandler;
use orbyt::ShardManagerContainer;

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
    guild_id: Option<GuildId>,
}

impl Handler {
    fn new(
        command_handler: CommandHandler,
        component_handler: MessageComponentHandler,
        guild_id: Option<GuildId>,
    ) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            component_handler: Arc::new(component_handler),
            guild_id,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {e}");
            if let Err(why) = msg
                .channel_id
                .say(
                    &ctx.http,
                    format!("⚠️ - Unexpected error, report to developers: ```\n{e}\n```"),
                )
                .await
            {
                error!("Failed to send error message: {why}");
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        let banner = [
            format!("{:<12}: {}", "User", ready.user.tag()),
            format!("{:<12}: {}", "ID", ready.user.id),
            format!("{:<12}: {}", "Version", orbyt::get_bot_version()),
            format!("{:<12}: {}", "Guilds", ready.guilds.len()),
            format!(
                "{:<12}: {}",
                "Debug Mode",
                self.command_handler.context().config.debug
            ),
        ];
        info!("{}", spaced_padding("Logged In", 52, '-'));
        for line in banner {
            info!("| > {line}");
        }

        let context = self.command_handler.context();
        info!("{}", spaced_padding("Extensions", 52, '-'));
        for ext in context.extensions.loaded() {
            info!("| > {ext}");
        }

        // Guild registration updates instantly, which is what you want while
        // developing; global registration can take up to an hour to propagate
        let result = if let Some(guild_id) = self.guild_id {
            info!("Development mode: registering commands for guild {guild_id}");
            register_guild_commands(&ctx, guild_id, &context.extensions).await
        } else {
            info!("Registering commands globally");
            register_global_commands(&ctx, &context.extensions).await
        };
        if let Err(e) = result {
            error!("Failed to register slash commands: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self
                    .command_handler
                    .handle_slash_command(&ctx, &command)
                    .await
                {
                    error!(
                        "Error handling slash command '{}': {}",
                        command.data.name, e
                    );

                    let error_message =
                        format!("⚠️ - Unknown Error, please report to developers:\n```\n{e}\n```");

                    // Prefer editing an existing (possibly deferred) response,
                    // fall back to a fresh one
                    if command
                        .edit_original_interaction_response(&ctx.http, |response| {
                            response.content(&error_message)
                        })
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| {
                                        message.content(&error_message).ephemeral(true)
                                    })
                            })
                            .await;
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self
                    .component_handler
                    .handle_component_interaction(&ctx, &component)
                    .await
                {
                    error!(
                        "Error handling component interaction '{}': {}",
                        component.data.custom_id, e
                    );

                    let _ = component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content(
                                            "⚠️ - Unexpected error, report to developers.",
                                        )
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            Interaction::ModalSubmit(modal) => {
                if let Err(e) = self
                    .component_handler
                    .handle_modal_submit(&ctx, &modal)
                    .await
                {
                    error!("Error handling modal submit '{}': {}", modal.data.custom_id, e);

                    let _ = modal
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content(
                                            "⚠️ - Unexpected error, report to developers.",
                                        )
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            Interaction::Ping(_) => {
                info!("Ping interaction received - Discord health check");
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Orbyt v{}...", orbyt::get_bot_version());

    let database = Database::new(&config.database_path).await?;

    let context = Arc::new(orbyt::commands::CommandContext::new(database, config.clone()));
    let command_handler = CommandHandler::new(Arc::clone(&context));
    let component_handler = MessageComponentHandler::new(Arc::clone(&context));

    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler::new(command_handler, component_handler, guild_id);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(config.active_token(), intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    info!("Bot configured successfully. Connecting to Discord gateway...");
    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start_autosharded().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
