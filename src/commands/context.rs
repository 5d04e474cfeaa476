//! Shared context for command handlers
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: Add card renderer and trivia client
//! - 1.1.0: Add extension manager and cooldown tracker
//! - 1.0.0: Initial implementation with core shared state

use std::time::Duration;

use serenity::model::permissions::Permissions;

use crate::core::Config;
use crate::database::Database;
use crate::features::cards::CardRenderer;
use crate::features::cooldowns::CooldownTracker;
use crate::features::extensions::ExtensionManager;
use crate::features::trivia::TriviaClient;

/// Shared context for all command handlers
///
/// Built once at startup and shared behind an `Arc`; the extension flags and
/// cooldown windows stay consistent across the command and component paths
/// only because there is a single instance.
pub struct CommandContext {
    pub database: Database,
    pub extensions: ExtensionManager,
    pub cooldowns: CooldownTracker,
    pub cards: CardRenderer,
    pub trivia: TriviaClient,
    pub config: Config,
    pub start_time: std::time::Instant,
}

/// Card command budget: one card per user per two minutes
const CARD_COOLDOWN_USES: usize = 1;
const CARD_COOLDOWN_WINDOW: Duration = Duration::from_secs(120);

impl CommandContext {
    /// Create the context from startup services.
    pub fn new(database: Database, config: Config) -> Self {
        let cards = CardRenderer::new(&config.asset_dir);
        CommandContext {
            database,
            extensions: ExtensionManager::new(),
            cooldowns: CooldownTracker::new(CARD_COOLDOWN_USES, CARD_COOLDOWN_WINDOW),
            cards,
            trivia: TriviaClient::new(),
            config,
            start_time: std::time::Instant::now(),
        }
    }

    /// Whether a user may bypass tag ownership checks: Manage Guild or
    /// Manage Messages in the invoking guild, or being a bot owner.
    pub fn can_moderate_tags(&self, permissions: Option<Permissions>, user_id: u64) -> bool {
        if self.config.is_owner(user_id) {
            return true;
        }
        permissions
            .map(|p| p.manage_guild() || p.manage_messages())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(owner: u64) -> Config {
        Config {
            discord_token: "t".to_string(),
            debug_bot_token: None,
            debug: false,
            database_path: ":memory:".to_string(),
            discord_guild_id: None,
            owner_ids: [owner].into_iter().collect(),
            prefix: "orbyt ".to_string(),
            log_level: "info".to_string(),
            asset_dir: "./assets".to_string(),
        }
    }

    #[tokio::test]
    async fn test_can_moderate_tags() {
        let database = Database::new(":memory:").await.unwrap();
        let context = CommandContext::new(database, test_config(7));

        // Owner always bypasses
        assert!(context.can_moderate_tags(None, 7));

        // Moderator permissions bypass
        assert!(context.can_moderate_tags(Some(Permissions::MANAGE_GUILD), 8));
        assert!(context.can_moderate_tags(Some(Permissions::MANAGE_MESSAGES), 8));

        // Plain members do not
        assert!(!context.can_moderate_tags(Some(Permissions::SEND_MESSAGES), 8));
        assert!(!context.can_moderate_tags(None, 8));
    }
}
