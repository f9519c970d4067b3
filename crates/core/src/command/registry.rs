//! Per-application command index
//!
//! Maps every registered command to its owning plugin, keyed by command key
//! or by alias string (optionally parent-qualified as `parent$child`).
//! Entries are kept behind a read-write lock and are never removed during a
//! run; removal APIs elsewhere only touch interceptors.

use super::command::Command;
use parking_lot::RwLock;
use std::sync::Arc;

/// One registered command and its owning plugin
#[derive(Debug, Clone)]
pub struct CommandEntry {
    command: Arc<Command>,
    owner: String,
    seq: u64,
}

impl CommandEntry {
    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Index of all commands registered with one application
pub struct CommandRegistry {
    entries: RwLock<Vec<CommandEntry>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Insert a command for an owning plugin
    ///
    /// Inserts unconditionally; re-registering a key for the same owner
    /// replaces the earlier entry (last write wins).
    pub fn add(&self, command: Arc<Command>, owner: impl Into<String>) {
        let owner = owner.into();
        let mut entries = self.entries.write();

        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.owner == owner && e.command.key() == command.key())
        {
            existing.command = command;
            return;
        }

        let seq = entries.len() as u64;
        tracing::debug!("Registered command '{}' for plugin {}", command.key(), owner);
        entries.push(CommandEntry {
            command,
            owner,
            seq,
        });
    }

    /// Look up a command by key
    pub fn command(&self, key: &str) -> Option<Arc<Command>> {
        self.entry(key).map(|entry| entry.command)
    }

    /// Look up a command entry by key
    pub fn entry(&self, key: &str) -> Option<CommandEntry> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.command.key() == key)
            .cloned()
    }

    /// Resolve an alias string, optionally parent-qualified
    ///
    /// With a `$` separator the string is read as `parent$child`: candidates
    /// are matched on primary aliases, and a child candidate wins if its
    /// declared parent (resolved within the same plugin) shares an alias with
    /// any parent candidate. Aliases are not globally unique across plugins,
    /// so this is what disambiguates two children that share a name. Without
    /// `$`, the first entry whose alias set contains the string wins.
    ///
    /// Candidates are visited sorted by owning plugin id, then registration
    /// order, so ties resolve the same way on every run.
    pub fn entry_by_alias(&self, alias: &str) -> Option<CommandEntry> {
        let mut entries: Vec<CommandEntry> = self.entries.read().clone();
        entries.sort_by(|a, b| a.owner.cmp(&b.owner).then(a.seq.cmp(&b.seq)));

        if let Some((parent_alias, child_alias)) = alias.split_once('$') {
            let parent_candidates: Vec<&CommandEntry> = entries
                .iter()
                .filter(|e| e.command.primary_alias() == parent_alias)
                .collect();

            for child in entries
                .iter()
                .filter(|e| e.command.primary_alias() == child_alias)
            {
                let Some(parent_key) = child.command.descriptor().parent.as_deref() else {
                    continue;
                };
                let Some(parent) = entries
                    .iter()
                    .find(|e| e.owner == child.owner && e.command.key() == parent_key)
                else {
                    continue;
                };
                if parent_candidates
                    .iter()
                    .any(|candidate| aliases_intersect(candidate.command.aliases(), parent.command.aliases()))
                {
                    return Some(child.clone());
                }
            }
            return None;
        }

        entries
            .iter()
            .find(|e| e.command.aliases().iter().any(|a| a == alias))
            .cloned()
    }

    /// Snapshot of all entries in deterministic (owner, registration) order
    pub fn entries(&self) -> Vec<CommandEntry> {
        let mut entries: Vec<CommandEntry> = self.entries.read().clone();
        entries.sort_by(|a, b| a.owner.cmp(&b.owner).then(a.seq.cmp(&b.seq)));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Aggregate counts over the registered commands
    pub fn stats(&self) -> RegistryStats {
        let entries = self.entries.read();
        let mut stats = RegistryStats::default();

        stats.total_commands = entries.len();
        for entry in entries.iter() {
            if entry.command.descriptor().parent.is_some() {
                stats.child_commands += 1;
            } else {
                stats.top_level_commands += 1;
            }
            if entry.command.is_async() {
                stats.async_commands += 1;
            }
        }

        stats
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn aliases_intersect(left: &[String], right: &[String]) -> bool {
    left.iter().any(|alias| right.contains(alias))
}

/// Command registry statistics
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    pub total_commands: usize,
    pub top_level_commands: usize,
    pub child_commands: usize,
    pub async_commands: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::command::{CommandDescriptor, CommandResult};
    use crate::command::source::{CommandArgs, CommandSource};

    fn command(descriptor: CommandDescriptor) -> Arc<Command> {
        Arc::new(Command::new(
            descriptor,
            Arc::new(|_: &CommandSource, _: &CommandArgs| Ok(CommandResult::Success)),
        ))
    }

    #[test]
    fn test_add_and_lookup_by_key() {
        let registry = CommandRegistry::new();
        registry.add(command(CommandDescriptor::new("spawn", "spawn")), "essentials");

        let entry = registry.entry("spawn").unwrap();
        assert_eq!(entry.owner(), "essentials");
        assert_eq!(entry.command().key(), "spawn");
        assert!(registry.entry("warp").is_none());
    }

    #[test]
    fn test_duplicate_key_same_owner_replaces() {
        let registry = CommandRegistry::new();
        registry.add(
            command(CommandDescriptor::new("spawn", "spawn").with_description("old")),
            "essentials",
        );
        registry.add(
            command(CommandDescriptor::new("spawn", "spawn").with_description("new")),
            "essentials",
        );

        assert_eq!(registry.len(), 1);
        let entry = registry.entry("spawn").unwrap();
        assert_eq!(entry.command().descriptor().description.as_deref(), Some("new"));
    }

    #[test]
    fn test_alias_lookup_matches_any_alias() {
        let registry = CommandRegistry::new();
        registry.add(
            command(CommandDescriptor::new("teleport", "tp").with_alias("goto")),
            "essentials",
        );

        assert_eq!(
            registry.entry_by_alias("goto").unwrap().command().key(),
            "teleport"
        );
        assert!(registry.entry_by_alias("fly").is_none());
    }

    #[test]
    fn test_parent_qualified_alias_disambiguates() {
        let registry = CommandRegistry::new();

        // Two plugins each register a `help` child under their own parent.
        registry.add(command(CommandDescriptor::new("root", "pluginA")), "plugin-a");
        registry.add(
            command(CommandDescriptor::new("help", "help").with_parent("root")),
            "plugin-a",
        );
        registry.add(command(CommandDescriptor::new("root", "pluginB")), "plugin-b");
        registry.add(
            command(CommandDescriptor::new("help", "help").with_parent("root")),
            "plugin-b",
        );

        let a = registry.entry_by_alias("pluginA$help").unwrap();
        let b = registry.entry_by_alias("pluginB$help").unwrap();
        assert_eq!(a.owner(), "plugin-a");
        assert_eq!(b.owner(), "plugin-b");
        assert!(registry.entry_by_alias("pluginC$help").is_none());
    }

    #[test]
    fn test_unqualified_tie_breaks_by_owner() {
        let registry = CommandRegistry::new();
        registry.add(command(CommandDescriptor::new("help", "help")), "zeta");
        registry.add(command(CommandDescriptor::new("help", "help")), "alpha");

        // Deterministic: alphabetical owner order, not insertion order.
        assert_eq!(registry.entry_by_alias("help").unwrap().owner(), "alpha");
    }

    #[test]
    fn test_stats() {
        let registry = CommandRegistry::new();
        registry.add(command(CommandDescriptor::new("mod", "mod")), "moderation");
        registry.add(
            command(CommandDescriptor::new("kick", "kick").with_parent("mod")),
            "moderation",
        );
        registry.add(
            command(CommandDescriptor::new("tpa", "tpa").asynchronous()),
            "teleport",
        );

        let stats = registry.stats();
        assert_eq!(stats.total_commands, 3);
        assert_eq!(stats.top_level_commands, 2);
        assert_eq!(stats.child_commands, 1);
        assert_eq!(stats.async_commands, 1);
    }
}
