//! # Core Module
//!
//! Core configuration, branding constants, and text utilities for the Orbyt bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add response module with text formatting utilities
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod constants;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{escape_markdown, spaced_padding, truncate, MESSAGE_LIMIT};
