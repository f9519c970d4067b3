//! Per-plugin state container

use super::handler::{CommandHandler, ConfigHandler, HelpProvider};
use super::plugin::PluginInfo;
use crate::command::{Command, CommandSpec, CommandState, CommandStore, Interceptor};
use crate::error::{FrameworkError, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Handler references populated as initialization proceeds
///
/// Each slot is set exactly once during plugin registration; idempotency is
/// assumed, not enforced.
#[derive(Default)]
struct HandlerSet {
    command: RwLock<Option<Arc<CommandHandler>>>,
    config: RwLock<Option<Arc<ConfigHandler>>>,
    help: RwLock<Option<Arc<HelpProvider>>>,
}

/// All state owned by one plugin
///
/// Created once per plugin at registration and never destroyed during a run.
/// Command stores and interceptor lists are mutated by administrative calls
/// at any time, so they live behind read-write locks; dispatch takes
/// snapshots rather than holding locks across user code.
pub struct PluginContainer {
    info: PluginInfo,
    stores: RwLock<BTreeMap<String, CommandStore>>,
    interceptors: RwLock<HashMap<String, Vec<Interceptor>>>,
    configs: RwLock<Vec<String>>,
    listeners: RwLock<Vec<String>>,
    metadata: RwLock<HashMap<String, serde_json::Value>>,
    handlers: HandlerSet,
}

impl PluginContainer {
    pub fn new(info: PluginInfo) -> Self {
        Self {
            info,
            stores: RwLock::new(BTreeMap::new()),
            interceptors: RwLock::new(HashMap::new()),
            configs: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
            metadata: RwLock::new(HashMap::new()),
            handlers: HandlerSet::default(),
        }
    }

    /// Plugin id; also the `plugin` field on every log line about it
    pub fn id(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &PluginInfo {
        &self.info
    }

    /// Install the fully built store set; called once at registration
    pub(crate) fn install_stores(&self, stores: BTreeMap<String, CommandStore>) {
        *self.stores.write() = stores;
    }

    pub fn has_command(&self, key: &str) -> bool {
        self.stores.read().contains_key(key)
    }

    /// Command keys in sorted order
    pub fn command_keys(&self) -> Vec<String> {
        self.stores.read().keys().cloned().collect()
    }

    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.stores
            .read()
            .values()
            .map(|store| Arc::clone(store.command()))
            .collect()
    }

    pub fn command_count(&self) -> usize {
        self.stores.read().len()
    }

    /// Current enable state of a command
    pub fn state(&self, key: &str) -> Option<CommandState> {
        self.stores.read().get(key).map(CommandStore::state)
    }

    /// Set the enable state of a command
    pub fn set_state(&self, key: &str, state: CommandState) -> Result<()> {
        let mut stores = self.stores.write();
        let Some(store) = stores.get_mut(key) else {
            tracing::error!(plugin = self.id(), "Cannot set state of unknown command '{}'", key);
            return Err(FrameworkError::UnknownCommand(key.to_string()));
        };
        store.set_state(state);
        Ok(())
    }

    /// Set every command of this plugin to the same state
    pub fn set_all_states(&self, state: CommandState) {
        for store in self.stores.write().values_mut() {
            store.set_state(state);
        }
    }

    /// Spec snapshot for one command
    pub fn spec(&self, key: &str) -> Option<CommandSpec> {
        self.stores.read().get(key).map(|store| store.spec().clone())
    }

    /// Resolved parent key of a command, if it is a child
    pub fn child_of(&self, key: &str) -> Option<String> {
        self.stores
            .read()
            .get(key)
            .and_then(|store| store.child_of().map(str::to_string))
    }

    /// Spec snapshots of all top-level commands
    pub fn top_level_specs(&self) -> Vec<CommandSpec> {
        self.stores
            .read()
            .values()
            .filter(|store| !store.is_child())
            .map(|store| store.spec().clone())
            .collect()
    }

    /// Attach an interceptor to one command
    pub fn add_interceptor(&self, key: &str, interceptor: Interceptor) -> Result<()> {
        if !self.has_command(key) {
            tracing::error!(
                plugin = self.id(),
                "Cannot attach interceptor to unknown command '{}'",
                key
            );
            return Err(FrameworkError::UnknownCommand(key.to_string()));
        }

        tracing::debug!(
            plugin = self.id(),
            "Attached {} interceptor (priority {}) to command '{}'",
            interceptor.phase(),
            interceptor.priority(),
            key
        );
        self.interceptors
            .write()
            .entry(key.to_string())
            .or_default()
            .push(interceptor);
        Ok(())
    }

    /// Attach an interceptor to every command except the excluded keys
    pub fn add_interceptor_for_all_except(&self, interceptor: &Interceptor, excluded: &[&str]) {
        let keys: Vec<String> = self
            .stores
            .read()
            .keys()
            .filter(|key| !excluded.contains(&key.as_str()))
            .cloned()
            .collect();

        let mut interceptors = self.interceptors.write();
        for key in keys {
            interceptors.entry(key).or_default().push(interceptor.clone());
        }
    }

    /// Remove every interceptor attached to one command
    ///
    /// Only the interceptor list is cleared; the command itself stays
    /// registered and enabled/disabled state is untouched.
    pub fn remove_interceptors(&self, key: &str) -> Result<()> {
        if !self.has_command(key) {
            tracing::error!(
                plugin = self.id(),
                "Cannot remove interceptors of unknown command '{}'",
                key
            );
            return Err(FrameworkError::UnknownCommand(key.to_string()));
        }

        self.interceptors.write().remove(key);
        tracing::debug!(plugin = self.id(), "Removed interceptors of command '{}'", key);
        Ok(())
    }

    /// Snapshot of the interceptors attached to one command, in insertion order
    pub fn interceptors_for(&self, key: &str) -> Vec<Interceptor> {
        self.interceptors
            .read()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn add_config(&self, name: impl Into<String>) {
        self.configs.write().push(name.into());
    }

    pub fn config_names(&self) -> Vec<String> {
        self.configs.read().clone()
    }

    pub(crate) fn add_listener(&self, event: impl Into<String>) {
        self.listeners.write().push(event.into());
    }

    pub fn listener_events(&self) -> Vec<String> {
        self.listeners.read().clone()
    }

    /// Set host-opaque metadata
    pub fn set_metadata(&self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.write().insert(key.into(), value);
    }

    /// Get host-opaque metadata
    pub fn metadata(&self, key: &str) -> Option<serde_json::Value> {
        self.metadata.read().get(key).cloned()
    }

    pub(crate) fn set_command_handler(&self, handler: Arc<CommandHandler>) {
        *self.handlers.command.write() = Some(handler);
    }

    pub(crate) fn set_config_handler(&self, handler: Arc<ConfigHandler>) {
        *self.handlers.config.write() = Some(handler);
    }

    pub(crate) fn set_help_provider(&self, provider: Arc<HelpProvider>) {
        *self.handlers.help.write() = Some(provider);
    }

    pub fn command_handler(&self) -> Option<Arc<CommandHandler>> {
        self.handlers.command.read().clone()
    }

    pub fn config_handler(&self) -> Option<Arc<ConfigHandler>> {
        self.handlers.config.read().clone()
    }

    pub fn help_provider(&self) -> Option<Arc<HelpProvider>> {
        self.handlers.help.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{
        CommandArgs, CommandDescriptor, CommandResult, CommandSource, Phase,
    };

    fn container_with(keys: &[&str]) -> PluginContainer {
        let container = PluginContainer::new(PluginInfo::new(
            "test-plugin",
            semver::Version::new(1, 0, 0),
        ));
        let mut stores = BTreeMap::new();
        for key in keys {
            let command = Arc::new(Command::new(
                CommandDescriptor::new(*key, *key),
                Arc::new(|_: &CommandSource, _: &CommandArgs| Ok(CommandResult::Success)),
            ));
            stores.insert(key.to_string(), CommandStore::new(command));
        }
        container.install_stores(stores);
        container
    }

    #[test]
    fn test_state_queries() {
        let container = container_with(&["spawn", "warp"]);

        assert_eq!(container.state("spawn"), Some(CommandState::Enabled));
        assert!(container.state("fly").is_none());

        container.set_state("spawn", CommandState::Disabled).unwrap();
        assert_eq!(container.state("spawn"), Some(CommandState::Disabled));
        assert!(container.set_state("fly", CommandState::Disabled).is_err());
    }

    #[test]
    fn test_set_all_states() {
        let container = container_with(&["spawn", "warp"]);
        container.set_all_states(CommandState::Disabled);

        assert_eq!(container.state("spawn"), Some(CommandState::Disabled));
        assert_eq!(container.state("warp"), Some(CommandState::Disabled));
    }

    #[test]
    fn test_interceptor_attachment() {
        let container = container_with(&["spawn", "warp", "fly"]);
        let interceptor = Interceptor::new(|_, _| None).with_phase(Phase::Pre);

        container.add_interceptor("spawn", interceptor.clone()).unwrap();
        assert_eq!(container.interceptors_for("spawn").len(), 1);
        assert!(container.add_interceptor("missing", interceptor.clone()).is_err());

        container.add_interceptor_for_all_except(&interceptor, &["spawn"]);
        assert_eq!(container.interceptors_for("spawn").len(), 1);
        assert_eq!(container.interceptors_for("warp").len(), 1);
        assert_eq!(container.interceptors_for("fly").len(), 1);
    }

    #[test]
    fn test_remove_interceptors_leaves_command_registered() {
        let container = container_with(&["spawn"]);
        container
            .add_interceptor("spawn", Interceptor::new(|_, _| None))
            .unwrap();

        container.remove_interceptors("spawn").unwrap();
        assert!(container.interceptors_for("spawn").is_empty());
        assert!(container.has_command("spawn"));
        assert_eq!(container.state("spawn"), Some(CommandState::Enabled));
    }

    #[test]
    fn test_metadata_round_trip() {
        let container = container_with(&[]);
        container.set_metadata("data-dir", serde_json::json!("plugins/test"));

        assert_eq!(
            container.metadata("data-dir"),
            Some(serde_json::json!("plugins/test"))
        );
        assert!(container.metadata("missing").is_none());
    }
}
