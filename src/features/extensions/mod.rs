//! # Feature: Extension Loader
//!
//! Runtime load/unload/reload of command extensions. Loaded state gates slash
//! command dispatch and registration; protected extensions (developer tools)
//! can never be unloaded.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with DashMap-backed loaded flags

use anyhow::{bail, Result};
use dashmap::DashMap;

use super::{get_extension, get_extensions};

/// Thread-safe loaded/unloaded flags for every known extension.
///
/// All extensions start loaded. The flags are the single source of truth for
/// which commands are dispatched and which are registered with Discord.
#[derive(Clone)]
pub struct ExtensionManager {
    loaded: DashMap<&'static str, bool>,
}

impl ExtensionManager {
    /// Create a manager with every extension loaded.
    pub fn new() -> Self {
        let loaded = DashMap::new();
        for ext in get_extensions() {
            loaded.insert(ext.id, true);
        }
        ExtensionManager { loaded }
    }

    /// Whether the extension is currently loaded.
    ///
    /// Unknown ids are treated as unloaded.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.loaded.get(id).map(|flag| *flag).unwrap_or(false)
    }

    /// Mark an extension loaded.
    pub fn load(&self, id: &str) -> Result<()> {
        let ext = match get_extension(id) {
            Some(ext) => ext,
            None => bail!("Extension `{id}` not found"),
        };
        if self.is_loaded(ext.id) {
            bail!("Extension `{id}` is already loaded");
        }
        self.loaded.insert(ext.id, true);
        Ok(())
    }

    /// Mark an extension unloaded. Protected extensions are refused.
    pub fn unload(&self, id: &str) -> Result<()> {
        let ext = match get_extension(id) {
            Some(ext) => ext,
            None => bail!("Extension `{id}` not found"),
        };
        if ext.protected {
            bail!("Extension `{id}` is protected and cannot be unloaded");
        }
        if !self.is_loaded(ext.id) {
            bail!("Extension `{id}` is not loaded");
        }
        self.loaded.insert(ext.id, false);
        Ok(())
    }

    /// Reload an extension. Mirrors unload-then-load semantics: the extension
    /// must currently be loaded.
    pub fn reload(&self, id: &str) -> Result<()> {
        let ext = match get_extension(id) {
            Some(ext) => ext,
            None => bail!("Extension `{id}` not found"),
        };
        if !self.is_loaded(ext.id) {
            bail!("Extension `{id}` is not loaded");
        }
        self.loaded.insert(ext.id, true);
        Ok(())
    }

    /// Ids of all loaded extensions, sorted for stable display.
    pub fn loaded(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self
            .loaded
            .iter()
            .filter(|entry| *entry.value())
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ExtensionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_extensions_start_loaded() {
        let manager = ExtensionManager::new();
        for ext in get_extensions() {
            assert!(manager.is_loaded(ext.id));
        }
    }

    #[test]
    fn test_unload_and_load_roundtrip() {
        let manager = ExtensionManager::new();

        manager.unload("games").unwrap();
        assert!(!manager.is_loaded("games"));
        assert!(!manager.loaded().contains(&"games"));

        manager.load("games").unwrap();
        assert!(manager.is_loaded("games"));
    }

    #[test]
    fn test_load_already_loaded_fails() {
        let manager = ExtensionManager::new();
        assert!(manager.load("tags").is_err());
    }

    #[test]
    fn test_unload_protected_fails() {
        let manager = ExtensionManager::new();
        let err = manager.unload("dev").unwrap_err();
        assert!(err.to_string().contains("protected"));
        assert!(manager.is_loaded("dev"));
    }

    #[test]
    fn test_unknown_extension_fails() {
        let manager = ExtensionManager::new();
        assert!(manager.load("bogus").is_err());
        assert!(manager.unload("bogus").is_err());
        assert!(manager.reload("bogus").is_err());
    }

    #[test]
    fn test_reload_requires_loaded() {
        let manager = ExtensionManager::new();
        manager.unload("info").unwrap();
        assert!(manager.reload("info").is_err());

        manager.load("info").unwrap();
        assert!(manager.reload("info").is_ok());
    }

    #[test]
    fn test_unknown_id_is_not_loaded() {
        let manager = ExtensionManager::new();
        assert!(!manager.is_loaded("bogus"));
    }
}
