//! # Features layer
//!
//! Feature modules behind the command surface, plus the extension descriptor
//! table used by the loader and the developer commands.
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.3.0: Add trivia feature
//! - 1.2.0: Add festive card rendering
//! - 1.1.0: Add embed builder and pagination
//! - 1.0.0: Initial extension registry

pub mod cards;
pub mod cooldowns;
pub mod embed_builder;
pub mod extensions;
pub mod pagination;
pub mod trivia;

pub use cooldowns::CooldownTracker;
pub use extensions::ExtensionManager;

/// Static description of one loadable extension.
pub struct ExtensionInfo {
    /// Identifier used by `dev load`/`unload`/`reload`
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Protected extensions can never be unloaded
    pub protected: bool,
}

const EXTENSIONS: &[ExtensionInfo] = &[
    ExtensionInfo {
        id: "info",
        name: "Info",
        description: "Commands that give out information",
        protected: false,
    },
    ExtensionInfo {
        id: "tags",
        name: "Tags",
        description: "Guild-scoped stored text snippets",
        protected: false,
    },
    ExtensionInfo {
        id: "embed",
        name: "Embed Builder",
        description: "Interactive custom embed builder",
        protected: false,
    },
    ExtensionInfo {
        id: "festive",
        name: "Festive",
        description: "Limited-time greeting card commands",
        protected: false,
    },
    ExtensionInfo {
        id: "games",
        name: "Games",
        description: "Trivia and other games",
        protected: false,
    },
    ExtensionInfo {
        id: "dev",
        name: "Developer",
        description: "Owner-only maintenance commands",
        protected: true,
    },
];

/// All known extensions.
pub fn get_extensions() -> &'static [ExtensionInfo] {
    EXTENSIONS
}

/// Look up one extension descriptor by id.
pub fn get_extension(id: &str) -> Option<&'static ExtensionInfo> {
    EXTENSIONS.iter().find(|ext| ext.id == id)
}

/// Crate version as reported by `/ping` and the startup banner.
pub fn get_bot_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_table_contains_all_command_groups() {
        for id in ["info", "tags", "embed", "festive", "games", "dev"] {
            assert!(get_extension(id).is_some(), "missing extension {id}");
        }
    }

    #[test]
    fn test_dev_extension_is_protected() {
        assert!(get_extension("dev").unwrap().protected);
        assert!(!get_extension("tags").unwrap().protected);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(get_extension("nope").is_none());
    }
}
