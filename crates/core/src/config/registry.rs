//! Config registry
//!
//! The simpler sibling of the command registry: one entry per declared
//! config file, keyed by owning plugin and config name.

use parking_lot::RwLock;
use std::path::PathBuf;

/// One declared config file
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub owner: String,
    pub name: String,
    pub shared: bool,
    pub path: PathBuf,
}

/// Index of all config files declared with one application
pub struct ConfigRegistry {
    entries: RwLock<Vec<ConfigEntry>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Insert an entry; re-declaring (owner, name) replaces the earlier one
    pub fn add(&self, entry: ConfigEntry) {
        let mut entries = self.entries.write();
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.owner == entry.owner && e.name == entry.name)
        {
            *existing = entry;
            return;
        }
        entries.push(entry);
    }

    pub fn entry(&self, owner: &str, name: &str) -> Option<ConfigEntry> {
        self.entries
            .read()
            .iter()
            .find(|e| e.owner == owner && e.name == name)
            .cloned()
    }

    /// All configs declared by one plugin
    pub fn entries_for(&self, owner: &str) -> Vec<ConfigEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(owner: &str, name: &str) -> ConfigEntry {
        ConfigEntry {
            owner: owner.to_string(),
            name: name.to_string(),
            shared: false,
            path: PathBuf::from(format!("config/{owner}/{name}.toml")),
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let registry = ConfigRegistry::new();
        registry.add(entry("teleport", "teleport"));
        registry.add(entry("teleport", "warps"));

        assert_eq!(registry.len(), 2);
        assert!(registry.entry("teleport", "warps").is_some());
        assert!(registry.entry("teleport", "homes").is_none());
        assert_eq!(registry.entries_for("teleport").len(), 2);
        assert!(registry.entries_for("moderation").is_empty());
    }

    #[test]
    fn test_redeclare_replaces() {
        let registry = ConfigRegistry::new();
        registry.add(entry("teleport", "teleport"));
        let mut updated = entry("teleport", "teleport");
        updated.shared = true;
        registry.add(updated);

        assert_eq!(registry.len(), 1);
        assert!(registry.entry("teleport", "teleport").unwrap().shared);
    }
}
