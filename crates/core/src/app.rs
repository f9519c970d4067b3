//! Application root owning the registries, containers and dispatcher
//!
//! There is no process-global state anywhere in the framework: everything
//! hangs off an [`App`] value, and independent applications can coexist in
//! one process. Plugin registration is the only place the command side of an
//! application grows; nothing is unregistered during a run.

use crate::command::{
    Command, CommandArgs, CommandDispatcher, CommandEntry, CommandRegistry, CommandResult,
    CommandSource, CommandState, CommandStore, Interceptor,
};
use crate::config::{ConfigBase, ConfigEntry, ConfigRegistry};
use crate::error::{FrameworkError, Result};
use crate::host::{CommandManager, EventBus, Scheduler};
use crate::plugin::{
    CommandHandler, ConfigHandler, HelpProvider, Plugin, PluginContainer, PluginInfo,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Plugin id the framework registers for itself
pub const FRAMEWORK_ID: &str = "kumo";

/// Central coordinator for plugins, commands and configs
pub struct App {
    containers: DashMap<String, Arc<PluginContainer>>,
    plugins: RwLock<Vec<(String, Box<dyn Plugin>)>>,
    registry: CommandRegistry,
    configs: ConfigRegistry,
    config_base: ConfigBase,
    dispatcher: CommandDispatcher,
    command_manager: Arc<dyn CommandManager>,
    event_bus: Arc<dyn EventBus>,
}

impl App {
    /// Create an application wired to its host collaborators
    pub fn new(
        command_manager: Arc<dyn CommandManager>,
        scheduler: Arc<dyn Scheduler>,
        event_bus: Arc<dyn EventBus>,
        config_root: impl Into<PathBuf>,
    ) -> Self {
        let app = Self {
            containers: DashMap::new(),
            plugins: RwLock::new(Vec::new()),
            registry: CommandRegistry::new(),
            configs: ConfigRegistry::new(),
            config_base: ConfigBase::new(config_root),
            dispatcher: CommandDispatcher::new(Arc::clone(&scheduler)),
            command_manager,
            event_bus,
        };

        // The framework itself counts as a plugin and owns a container.
        let version = semver::Version::parse(env!("CARGO_PKG_VERSION"))
            .unwrap_or_else(|_| semver::Version::new(0, 0, 0));
        let info = PluginInfo::new(FRAMEWORK_ID, version.clone())
            .with_description("Kumo plugin framework");
        let container = Arc::new(PluginContainer::new(info));
        container.set_command_handler(Arc::new(CommandHandler::new(&container)));
        container.set_config_handler(Arc::new(ConfigHandler::new(
            app.config_base.clone(),
            FRAMEWORK_ID,
        )));
        container.set_help_provider(Arc::new(HelpProvider::new(&container)));
        app.containers.insert(FRAMEWORK_ID.to_string(), container);

        tracing::info!("Initialized kumo framework v{}", version);
        app
    }

    /// Register a plugin and everything it declares
    ///
    /// Builds command stores in two passes (creation, then parent
    /// resolution), links children into their parents' specs, registers each
    /// top-level spec with the host command manager, creates declared config
    /// files and forwards listeners, then calls the plugin's enable hook.
    pub fn register_plugin<P: Plugin + 'static>(&self, plugin: P) -> Result<()> {
        let info = plugin.info();
        let id = info.name.clone();

        if self.containers.contains_key(&id) {
            return Err(FrameworkError::DuplicatePlugin(id));
        }

        // Pass 1: one command and store per registration, in table order.
        let mut stores: BTreeMap<String, CommandStore> = BTreeMap::new();
        for registration in plugin.commands() {
            let descriptor = registration.descriptor;
            let key = descriptor.key.clone();
            if descriptor.aliases.is_empty() {
                return Err(FrameworkError::MissingAlias(key));
            }
            if stores.contains_key(&key) {
                return Err(FrameworkError::DuplicateCommand(key));
            }
            let command = Arc::new(Command::new(descriptor, registration.executor));
            stores.insert(key, CommandStore::new(command));
        }

        // Pass 2: resolve declared parents now that the whole batch is known.
        resolve_parents(&mut stores)?;
        link_children(&mut stores);

        let container = Arc::new(PluginContainer::new(info.clone()));

        // Only top-level commands reach the host; children are reachable
        // solely through their parent's spec.
        let mut top_level: Vec<&CommandStore> =
            stores.values().filter(|store| !store.is_child()).collect();
        top_level.sort_by(|a, b| {
            a.command()
                .primary_alias()
                .cmp(b.command().primary_alias())
        });
        for store in top_level {
            self.command_manager
                .register(store.spec(), store.command().aliases())
                .map_err(FrameworkError::Host)?;
        }

        for store in stores.values() {
            self.registry.add(Arc::clone(store.command()), &id);
        }
        container.install_stores(stores);

        for config in plugin.configs() {
            let path = self.config_base.resolve(&id, config.shared, &config.name);
            self.config_base
                .load_or_create::<toml::Table, _>(&path, || (config.populate)())?;
            self.configs.add(ConfigEntry {
                owner: id.clone(),
                name: config.name.clone(),
                shared: config.shared,
                path,
            });
            container.add_config(config.name);
        }

        for listener in plugin.listeners() {
            self.event_bus
                .subscribe(&listener.event, Arc::clone(&listener.handler))
                .map_err(FrameworkError::Host)?;
            container.add_listener(listener.event);
        }

        container.set_command_handler(Arc::new(CommandHandler::new(&container)));
        container.set_config_handler(Arc::new(ConfigHandler::new(
            self.config_base.clone(),
            &id,
        )));
        container.set_help_provider(Arc::new(HelpProvider::new(&container)));

        self.containers.insert(id.clone(), Arc::clone(&container));

        if let Err(source) = plugin.on_enable() {
            tracing::error!("Failed to enable plugin {}: {:#}", id, source);
            return Err(FrameworkError::PluginEnable { plugin: id, source });
        }

        tracing::info!(
            "Registered plugin: {} v{} ({} commands)",
            id,
            info.version,
            container.command_count()
        );
        self.plugins.write().push((id, Box::new(plugin)));
        Ok(())
    }

    /// Execute a command by key with a resolved source and arguments
    ///
    /// The host calls this after it has parsed raw input. Unknown keys are
    /// logged and answered with an empty result; no failure mode reaches the
    /// caller as an error.
    pub fn execute(
        &self,
        key: &str,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> CommandResult {
        let Some(entry) = self.registry.entry(key) else {
            tracing::error!("Cannot execute unknown command '{}'", key);
            return CommandResult::Empty;
        };
        self.dispatch_entry(entry, source, args)
    }

    /// Execute a command resolved by alias, optionally `parent$child`-qualified
    pub fn execute_alias(
        &self,
        alias: &str,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> CommandResult {
        let Some(entry) = self.registry.entry_by_alias(alias) else {
            tracing::error!("Cannot execute unknown command alias '{}'", alias);
            return CommandResult::Empty;
        };
        self.dispatch_entry(entry, source, args)
    }

    fn dispatch_entry(
        &self,
        entry: CommandEntry,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> CommandResult {
        let Some(container) = self
            .containers
            .get(entry.owner())
            .map(|c| Arc::clone(c.value()))
        else {
            tracing::error!(
                "No plugin container owns command '{}'",
                entry.command().key()
            );
            return CommandResult::Empty;
        };
        self.dispatcher
            .execute(entry.command(), &container, source, args)
    }

    fn owning_container(&self, key: &str) -> Result<Arc<PluginContainer>> {
        let entry = self.registry.entry(key).ok_or_else(|| {
            tracing::error!("Command '{}' not found", key);
            FrameworkError::UnknownCommand(key.to_string())
        })?;
        self.containers
            .get(entry.owner())
            .map(|c| Arc::clone(c.value()))
            .ok_or_else(|| {
                tracing::error!("No plugin container owns command '{}'", key);
                FrameworkError::UnknownPlugin(entry.owner().to_string())
            })
    }

    /// Current enable state of a command
    pub fn state(&self, key: &str) -> Option<CommandState> {
        self.owning_container(key).ok().and_then(|c| c.state(key))
    }

    /// Set the enable state of a command
    pub fn set_state(&self, key: &str, state: CommandState) -> Result<()> {
        self.owning_container(key)?.set_state(key, state)
    }

    /// Attach an interceptor to the given commands
    pub fn add_interceptor(&self, interceptor: Interceptor, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.owning_container(key)?
                .add_interceptor(key, interceptor.clone())?;
        }
        Ok(())
    }

    /// Attach an interceptor to every registered command except the excluded keys
    pub fn add_interceptor_for_all_except(&self, interceptor: Interceptor, excluded: &[&str]) {
        for entry in self.registry.entries() {
            let key = entry.command().key();
            if excluded.contains(&key) {
                continue;
            }
            if let Some(container) = self.containers.get(entry.owner()) {
                let _ = container.add_interceptor(key, interceptor.clone());
            }
        }
    }

    /// Remove every interceptor attached to a command
    pub fn remove_interceptors(&self, key: &str) -> Result<()> {
        self.owning_container(key)?.remove_interceptors(key)
    }

    pub fn command(&self, key: &str) -> Option<Arc<Command>> {
        self.registry.command(key)
    }

    pub fn entry_by_alias(&self, alias: &str) -> Option<CommandEntry> {
        self.registry.entry_by_alias(alias)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config_registry(&self) -> &ConfigRegistry {
        &self.configs
    }

    pub fn config_base(&self) -> &ConfigBase {
        &self.config_base
    }

    pub fn container(&self, id: &str) -> Option<Arc<PluginContainer>> {
        self.containers.get(id).map(|c| Arc::clone(c.value()))
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    /// Registered plugin ids, framework container included
    pub fn plugin_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.containers.iter().map(|c| c.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn plugin_count(&self) -> usize {
        self.containers.len()
    }

    /// Disable every plugin in reverse registration order
    ///
    /// Hook failures are logged, never propagated; shutdown always finishes.
    pub fn shutdown(&self) {
        let plugins = self.plugins.read();
        for (id, plugin) in plugins.iter().rev() {
            if let Err(e) = plugin.on_disable() {
                tracing::error!("Failed to disable plugin {}: {:#}", id, e);
            }
        }
        tracing::info!("Shut down {} plugins", plugins.len());
    }
}

/// Resolve declared parent keys against the whole registration batch
///
/// A declared parent that matches no key in the batch is a registration
/// error, as is a parent chain that loops back on itself.
fn resolve_parents(stores: &mut BTreeMap<String, CommandStore>) -> Result<()> {
    let declared: Vec<(String, String)> = stores
        .values()
        .filter_map(|store| {
            store
                .command()
                .descriptor()
                .parent
                .clone()
                .map(|parent| (store.key().to_string(), parent))
        })
        .collect();

    for (key, parent) in &declared {
        if !stores.contains_key(parent) {
            return Err(FrameworkError::UnresolvedParent {
                command: key.clone(),
                parent: parent.clone(),
            });
        }
    }

    for key in stores.keys() {
        let mut steps = 0;
        let mut current = stores
            .get(key)
            .and_then(|s| s.command().descriptor().parent.clone());
        while let Some(parent_key) = current {
            steps += 1;
            if steps > stores.len() {
                return Err(FrameworkError::ParentCycle(key.clone()));
            }
            current = stores
                .get(&parent_key)
                .and_then(|s| s.command().descriptor().parent.clone());
        }
    }

    for (key, parent) in declared {
        if let Some(store) = stores.get_mut(&key) {
            store.set_child_of(parent);
        }
    }
    Ok(())
}

/// Clone child specs into their parents' specs
///
/// Deepest chains are linked first so a grandchild is already wired into its
/// parent before that parent is cloned into the grandparent; ties break by
/// primary alias so registration is reproducible.
fn link_children(stores: &mut BTreeMap<String, CommandStore>) {
    let mut links: Vec<(usize, String, String, String)> = stores
        .values()
        .filter_map(|store| {
            store.child_of().map(|parent| {
                (
                    chain_depth(stores, store.key()),
                    store.command().primary_alias().to_string(),
                    store.key().to_string(),
                    parent.to_string(),
                )
            })
        })
        .collect();
    links.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    for (_, _, child_key, parent_key) in links {
        let child_spec = stores.get(&child_key).map(|store| store.spec().clone());
        if let (Some(child_spec), Some(parent)) = (child_spec, stores.get_mut(&parent_key)) {
            parent.spec_mut().add_child(child_spec);
        }
    }
}

fn chain_depth(stores: &BTreeMap<String, CommandStore>, key: &str) -> usize {
    let mut depth = 0;
    let mut current = stores
        .get(key)
        .and_then(|s| s.child_of().map(str::to_string));
    while let Some(parent_key) = current {
        depth += 1;
        if depth > stores.len() {
            break; // cycles are rejected during parent resolution
        }
        current = stores
            .get(&parent_key)
            .and_then(|s| s.child_of().map(str::to_string));
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{
        CommandDescriptor, CommandExecutor, CommandFailure, CommandSpec, MessageSink, SourceKind,
    };
    use crate::host::{ManualScheduler, NullCommandManager, NullEventBus};
    use crate::plugin::CommandRegistration;
    use parking_lot::Mutex;

    struct RecordingManager {
        registered: Mutex<Vec<(CommandSpec, Vec<String>)>>,
    }

    impl RecordingManager {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                registered: Mutex::new(Vec::new()),
            })
        }

        fn registered(&self) -> Vec<(CommandSpec, Vec<String>)> {
            self.registered.lock().clone()
        }
    }

    impl CommandManager for RecordingManager {
        fn register(&self, spec: &CommandSpec, aliases: &[String]) -> anyhow::Result<()> {
            self.registered
                .lock()
                .push((spec.clone(), aliases.to_vec()));
            Ok(())
        }
    }

    struct Silent;
    impl MessageSink for Silent {
        fn send_message(&self, _message: &str) {}
    }

    struct TestPlugin {
        name: &'static str,
        descriptors: Vec<CommandDescriptor>,
    }

    impl Plugin for TestPlugin {
        fn info(&self) -> PluginInfo {
            PluginInfo::new(self.name, semver::Version::new(1, 0, 0))
        }

        fn commands(&self) -> Vec<CommandRegistration> {
            let executor: Arc<dyn CommandExecutor> =
                Arc::new(|_: &CommandSource, _: &CommandArgs| {
                    Ok::<CommandResult, CommandFailure>(CommandResult::Success)
                });
            self.descriptors
                .iter()
                .map(|d| CommandRegistration::new(d.clone(), Arc::clone(&executor)))
                .collect()
        }
    }

    fn app_with(manager: Arc<RecordingManager>) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            manager,
            Arc::new(ManualScheduler::new()),
            Arc::new(NullEventBus),
            dir.path(),
        );
        (app, dir)
    }

    fn source() -> CommandSource {
        CommandSource::new(SourceKind::Player, "alice", Arc::new(Silent))
    }

    #[test]
    fn test_parent_child_registration_shape() {
        let manager = RecordingManager::new();
        let (app, _dir) = app_with(Arc::clone(&manager));

        app.register_plugin(TestPlugin {
            name: "ab",
            descriptors: vec![
                CommandDescriptor::new("a", "a"),
                CommandDescriptor::new("b", "b").with_parent("a"),
            ],
        })
        .unwrap();

        // Both commands are indexed, but only the parent reached the host.
        assert!(app.command("a").is_some());
        assert!(app.command("b").is_some());
        let registered = manager.registered();
        assert_eq!(registered.len(), 1);
        let (spec, aliases) = &registered[0];
        assert_eq!(aliases, &["a".to_string()]);
        assert!(spec.child("b").is_some());

        let container = app.container("ab").unwrap();
        assert_eq!(container.child_of("b"), Some("a".to_string()));
        assert_eq!(container.child_of("a"), None);
    }

    #[test]
    fn test_grandchildren_are_linked_through_children() {
        let manager = RecordingManager::new();
        let (app, _dir) = app_with(Arc::clone(&manager));

        app.register_plugin(TestPlugin {
            name: "deep",
            descriptors: vec![
                CommandDescriptor::new("root", "root"),
                CommandDescriptor::new("mid", "mid").with_parent("root"),
                CommandDescriptor::new("leaf", "leaf").with_parent("mid"),
            ],
        })
        .unwrap();

        let registered = manager.registered();
        assert_eq!(registered.len(), 1);
        let (spec, _) = &registered[0];
        let mid = spec.child("mid").unwrap();
        assert!(mid.child("leaf").is_some());
    }

    #[test]
    fn test_unresolved_parent_is_an_error() {
        let (app, _dir) = app_with(RecordingManager::new());

        let result = app.register_plugin(TestPlugin {
            name: "broken",
            descriptors: vec![CommandDescriptor::new("kick", "kick").with_parent("mod")],
        });

        assert!(matches!(
            result,
            Err(FrameworkError::UnresolvedParent { .. })
        ));
        assert!(!app.has_plugin("broken"));
    }

    #[test]
    fn test_parent_cycle_is_an_error() {
        let (app, _dir) = app_with(RecordingManager::new());

        let result = app.register_plugin(TestPlugin {
            name: "loop",
            descriptors: vec![
                CommandDescriptor::new("a", "a").with_parent("b"),
                CommandDescriptor::new("b", "b").with_parent("a"),
            ],
        });

        assert!(matches!(result, Err(FrameworkError::ParentCycle(_))));
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let (app, _dir) = app_with(RecordingManager::new());

        app.register_plugin(TestPlugin {
            name: "twice",
            descriptors: vec![CommandDescriptor::new("a", "a")],
        })
        .unwrap();
        let result = app.register_plugin(TestPlugin {
            name: "twice",
            descriptors: vec![],
        });

        assert!(matches!(result, Err(FrameworkError::DuplicatePlugin(_))));
    }

    #[test]
    fn test_state_round_trip_through_app() {
        let (app, _dir) = app_with(RecordingManager::new());
        app.register_plugin(TestPlugin {
            name: "essentials",
            descriptors: vec![CommandDescriptor::new("spawn", "spawn")],
        })
        .unwrap();

        assert_eq!(app.state("spawn"), Some(CommandState::Enabled));
        app.set_state("spawn", CommandState::Disabled).unwrap();
        assert_eq!(app.state("spawn"), Some(CommandState::Disabled));
        assert!(app.state("missing").is_none());
        assert!(app.set_state("missing", CommandState::Enabled).is_err());
    }

    #[test]
    fn test_execute_unknown_key_is_empty() {
        let (app, _dir) = app_with(RecordingManager::new());
        let result = app.execute("missing", &source(), &CommandArgs::new());
        assert_eq!(result, CommandResult::Empty);
    }

    #[test]
    fn test_interceptor_for_all_except_skips_excluded() {
        let (app, _dir) = app_with(RecordingManager::new());
        app.register_plugin(TestPlugin {
            name: "essentials",
            descriptors: vec![
                CommandDescriptor::new("spawn", "spawn"),
                CommandDescriptor::new("warp", "warp"),
            ],
        })
        .unwrap();

        app.add_interceptor_for_all_except(Interceptor::new(|_, _| None), &["spawn"]);

        let container = app.container("essentials").unwrap();
        assert!(container.interceptors_for("spawn").is_empty());
        assert_eq!(container.interceptors_for("warp").len(), 1);
    }

    #[test]
    fn test_framework_registers_its_own_container() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            Arc::new(NullCommandManager),
            Arc::new(ManualScheduler::new()),
            Arc::new(NullEventBus),
            dir.path(),
        );

        assert!(app.has_plugin(FRAMEWORK_ID));
        assert!(app.container(FRAMEWORK_ID).unwrap().command_handler().is_some());
    }
}
