//! # Feature: Festive Cards
//!
//! Limited-time greeting card commands. Cards are composited from bundled
//! background art and fonts, previewed ephemerally, and delivered by DM after
//! an explicit confirmation.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.4.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Christmas cards in four colors

pub mod renderer;

pub use renderer::CardRenderer;

use dashmap::DashMap;
use rand::seq::IndexedRandom;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Confirm-view ids; routed through the shared confirm_/cancel_ prefixes
pub const CARD_CONFIRM: &str = "confirm_card";
pub const CARD_CANCEL: &str = "cancel_card";

/// Card previews expire with the confirm view
const PENDING_TTL: Duration = Duration::from_secs(60);

static PENDING_CARDS: OnceLock<DashMap<u64, PendingCard>> = OnceLock::new();

/// Pending card deliveries, keyed by the preview message id.
pub fn pending_cards() -> &'static DashMap<u64, PendingCard> {
    PENDING_CARDS.get_or_init(DashMap::new)
}

/// A rendered card waiting for its author to confirm delivery.
pub struct PendingCard {
    pub png: Vec<u8>,
    pub author_id: u64,
    pub author_name: String,
    pub recipient_id: u64,
    pub guild_name: String,
    pub jump_url: String,
    created: Instant,
}

impl PendingCard {
    pub fn new(
        png: Vec<u8>,
        author_id: u64,
        author_name: String,
        recipient_id: u64,
        guild_name: String,
        jump_url: String,
    ) -> Self {
        PendingCard {
            png,
            author_id,
            author_name,
            recipient_id,
            guild_name,
            jump_url,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() > PENDING_TTL
    }
}

/// Background art variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColor {
    Blue,
    Green,
    Purple,
    Red,
}

impl CardColor {
    /// Parse the slash command choice; unset falls back to Blue.
    pub fn from_option(value: Option<&str>) -> CardColor {
        match value.map(|v| v.to_lowercase()).as_deref() {
            Some("green") => CardColor::Green,
            Some("purple") => CardColor::Purple,
            Some("red") => CardColor::Red,
            _ => CardColor::Blue,
        }
    }

    /// Lowercase name used in asset file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardColor::Blue => "blue",
            CardColor::Green => "green",
            CardColor::Purple => "purple",
            CardColor::Red => "red",
        }
    }
}

const GREETINGS: &[&str] = &[
    "Merry Christmas and Happy New Year!",
    "Season's Greetings! And best wishes for the New Year.",
    "I hope your holiday is full of love, peace, and joy!",
    "Merry Christmas! And best wishes for the new year.",
    "Merry Christmas! Wishing you all the happiness in the world.",
    "Wishing you peace and joy all season long. Happy Holidays!",
];

const FESTIVE_EMOJIS: &[&str] = &["💖", "🎁", "🎅", "⛄", "🎄", "💝", "❄️"];

/// Random greeting line for the card body.
pub fn pick_greeting() -> &'static str {
    let mut rng = rand::rng();
    GREETINGS.choose(&mut rng).copied().unwrap_or(GREETINGS[0])
}

/// Random festive emoji for the delivery DM.
pub fn pick_festive_emoji() -> &'static str {
    let mut rng = rand::rng();
    FESTIVE_EMOJIS
        .choose(&mut rng)
        .copied()
        .unwrap_or(FESTIVE_EMOJIS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_color_from_option() {
        assert_eq!(CardColor::from_option(None), CardColor::Blue);
        assert_eq!(CardColor::from_option(Some("Green")), CardColor::Green);
        assert_eq!(CardColor::from_option(Some("PURPLE")), CardColor::Purple);
        assert_eq!(CardColor::from_option(Some("red")), CardColor::Red);
        assert_eq!(CardColor::from_option(Some("plaid")), CardColor::Blue);
    }

    #[test]
    fn test_pick_greeting_comes_from_the_fixed_list() {
        for _ in 0..20 {
            assert!(GREETINGS.contains(&pick_greeting()));
        }
    }

    #[test]
    fn test_pending_card_fresh() {
        let card = PendingCard::new(vec![1, 2, 3], 1, "a".into(), 2, "g".into(), "url".into());
        assert!(!card.is_expired());
        assert_eq!(card.png, vec![1, 2, 3]);
    }
}
