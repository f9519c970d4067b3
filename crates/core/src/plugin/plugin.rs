//! Core plugin trait and registration tables
//!
//! Plugins declare their commands, configs and listeners as explicit tables
//! returned from trait methods; nothing is discovered by scanning. Table
//! order is registration order.

use crate::command::{CommandDescriptor, CommandExecutor};
use crate::host::EventHandlerFn;
use anyhow::Result;
use std::sync::Arc;

/// Plugin information and metadata
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Plugin name (must be unique; doubles as the plugin id)
    pub name: String,
    /// Plugin version
    pub version: semver::Version,
    /// Plugin description
    pub description: String,
    /// Plugin author(s)
    pub authors: String,
}

impl PluginInfo {
    /// Create new plugin info
    pub fn new(name: impl Into<String>, version: semver::Version) -> Self {
        Self {
            name: name.into(),
            version,
            description: String::new(),
            authors: String::new(),
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set author(s)
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }
}

/// One command a plugin registers: its descriptor plus its body
pub struct CommandRegistration {
    pub descriptor: CommandDescriptor,
    pub executor: Arc<dyn CommandExecutor>,
}

impl CommandRegistration {
    pub fn new(descriptor: CommandDescriptor, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            descriptor,
            executor,
        }
    }
}

/// One config file a plugin declares
///
/// `populate` produces the initial document and runs only when the file is
/// first created.
pub struct ConfigRegistration {
    pub name: String,
    pub shared: bool,
    pub populate: Box<dyn Fn() -> toml::Table + Send + Sync>,
}

impl ConfigRegistration {
    pub fn new<F>(name: impl Into<String>, populate: F) -> Self
    where
        F: Fn() -> toml::Table + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            shared: false,
            populate: Box::new(populate),
        }
    }

    /// Place the file under the shared config root instead of the plugin's
    pub fn shared<F>(name: impl Into<String>, populate: F) -> Self
    where
        F: Fn() -> toml::Table + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            shared: true,
            populate: Box::new(populate),
        }
    }
}

/// One event listener a plugin declares
pub struct ListenerRegistration {
    pub event: String,
    pub handler: Arc<EventHandlerFn>,
}

impl ListenerRegistration {
    pub fn new<F>(event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&serde_json::Value) + Send + Sync + 'static,
    {
        Self {
            event: event.into(),
            handler: Arc::new(handler),
        }
    }
}

/// Core trait that all plugins implement
pub trait Plugin: Send + Sync {
    /// Get plugin information and metadata
    fn info(&self) -> PluginInfo;

    /// The commands this plugin registers, in registration order
    fn commands(&self) -> Vec<CommandRegistration>;

    /// The config files this plugin declares
    fn configs(&self) -> Vec<ConfigRegistration> {
        Vec::new()
    }

    /// The event listeners this plugin declares
    fn listeners(&self) -> Vec<ListenerRegistration> {
        Vec::new()
    }

    /// Called after the plugin's commands, configs and listeners are wired up
    fn on_enable(&self) -> Result<()> {
        Ok(())
    }

    /// Called during application shutdown, in reverse registration order
    fn on_disable(&self) -> Result<()> {
        Ok(())
    }
}
