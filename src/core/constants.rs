//! Branding constants shared across command handlers.
//!
//! Custom emoji strings render only in guilds that can see the Orbyt emoji
//! pack; they degrade to `:name:` text elsewhere.

/// Red cross, prefixed to rejection messages
pub const EMOJI_NO: &str = "<:no:996055053628612699>";
/// Green check, prefixed to confirmation messages
pub const EMOJI_YES: &str = "<:yes:996055071433437184>";
/// Network icon used by /ping
pub const EMOJI_NETWORK: &str = "<:network:1080529982520037446>";

/// Secondary brand color
pub const SECONDARY_COLOR: u32 = 0x1f87a7;
/// Background brand color
pub const BG_COLOR: u32 = 0x081927;
/// Accent brand color
pub const ACCENT_COLOR: u32 = 0xd3d3d3;
/// Contrast color used for highlighted embeds
pub const CONTRAST_COLOR: u32 = 0xF0B232;

/// Blurple used for list embeds
pub const BLURPLE: u32 = 0x5865F2;
/// Green used for success embeds
pub const GREEN: u32 = 0x57F287;
/// Yellow used for edit confirmations
pub const YELLOW: u32 = 0xFEE75C;
