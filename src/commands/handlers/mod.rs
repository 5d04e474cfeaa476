//! Per-extension command handler implementations
//!
//! - **Version**: 1.4.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.4.0: Add GamesHandler (trivia)
//! - 1.3.0: Add FestiveHandler (card)
//! - 1.2.0: Add EmbedHandler (embed-builder)
//! - 1.1.0: Add TagsHandler (tag group)
//! - 1.0.0: Initial extraction with InfoHandler (ping)

pub mod embed;
pub mod festive;
pub mod games;
pub mod info;
pub mod tags;

use std::sync::Arc;

use super::handler::SlashCommandHandler;

/// Create all registered command handlers
///
/// Returns a vector of handlers ready to be registered with CommandRegistry.
pub fn create_all_handlers() -> Vec<Arc<dyn SlashCommandHandler>> {
    vec![
        Arc::new(info::InfoHandler),
        Arc::new(tags::TagsHandler),
        Arc::new(embed::EmbedHandler),
        Arc::new(festive::FestiveHandler),
        Arc::new(games::GamesHandler),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::get_extension;

    #[test]
    fn test_all_handlers_created() {
        let handlers = create_all_handlers();
        assert_eq!(handlers.len(), 5);
    }

    #[test]
    fn test_handler_extensions_exist_in_registry() {
        for handler in create_all_handlers() {
            assert!(
                get_extension(handler.extension()).is_some(),
                "handler for {:?} names unknown extension {}",
                handler.command_names(),
                handler.extension()
            );
        }
    }
}
