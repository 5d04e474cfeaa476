//! # Configuration
//!
//! Environment-sourced bot configuration.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add asset directory for festive card rendering
//! - 1.1.0: Add debug token switching and owner list
//! - 1.0.0: Initial implementation

use anyhow::{Context as _, Result};
use std::collections::HashSet;

/// Bot configuration loaded from environment variables (usually via `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Production bot token (`DISCORD_TOKEN`)
    pub discord_token: String,
    /// Optional development bot token (`DEBUG_BOT_TOKEN`)
    pub debug_bot_token: Option<String>,
    /// Debug flag (`DEBUG`); switches the active token and log verbosity
    pub debug: bool,
    /// Path of the SQLite database file (`DATABASE_PATH`, default `orbyt.db`)
    pub database_path: String,
    /// Optional guild id for instant slash-command registration during development
    pub discord_guild_id: Option<String>,
    /// User ids allowed to run developer prefix commands (`OWNER_IDS`, comma-separated)
    pub owner_ids: HashSet<u64>,
    /// Textual command prefix, matched case-insensitively (`COMMAND_PREFIX`, default `orbyt `)
    pub prefix: String,
    /// Default log filter (`LOG_LEVEL`, default `info`)
    pub log_level: String,
    /// Directory holding card backgrounds and fonts (`ASSET_DIR`, default `./assets`)
    pub asset_dir: String,
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let discord_token =
            std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
        let debug_bot_token = std::env::var("DEBUG_BOT_TOKEN").ok();
        let debug = std::env::var("DEBUG")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let owner_ids = std::env::var("OWNER_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        Ok(Config {
            discord_token,
            debug_bot_token,
            debug,
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "orbyt.db".to_string()),
            discord_guild_id: std::env::var("DISCORD_GUILD_ID").ok(),
            owner_ids,
            prefix: std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| "orbyt ".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            asset_dir: std::env::var("ASSET_DIR").unwrap_or_else(|_| "./assets".to_string()),
        })
    }

    /// The token the client should connect with.
    ///
    /// With `DEBUG=true` and a debug token configured, the debug bot is used so
    /// the production bot stays untouched during development.
    pub fn active_token(&self) -> &str {
        if self.debug {
            if let Some(token) = &self.debug_bot_token {
                return token;
            }
        }
        &self.discord_token
    }

    /// Whether the given user may run developer-only commands.
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            discord_token: "prod-token".to_string(),
            debug_bot_token: Some("debug-token".to_string()),
            debug: false,
            database_path: "orbyt.db".to_string(),
            discord_guild_id: None,
            owner_ids: [1234u64].into_iter().collect(),
            prefix: "orbyt ".to_string(),
            log_level: "info".to_string(),
            asset_dir: "./assets".to_string(),
        }
    }

    #[test]
    fn test_active_token_production() {
        let config = base_config();
        assert_eq!(config.active_token(), "prod-token");
    }

    #[test]
    fn test_active_token_debug() {
        let mut config = base_config();
        config.debug = true;
        assert_eq!(config.active_token(), "debug-token");
    }

    #[test]
    fn test_active_token_debug_without_debug_token() {
        let mut config = base_config();
        config.debug = true;
        config.debug_bot_token = None;
        assert_eq!(config.active_token(), "prod-token");
    }

    #[test]
    fn test_is_owner() {
        let config = base_config();
        assert!(config.is_owner(1234));
        assert!(!config.is_owner(5678));
    }
}
