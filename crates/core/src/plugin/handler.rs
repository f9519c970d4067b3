//! Per-plugin administrative facades
//!
//! Each container gets a small set of handlers at registration time: the
//! command handler (enable/disable and interceptor management), the config
//! handler (plugin-scoped config access) and the help provider. Handlers
//! hold weak references so a container never keeps itself alive through its
//! own facade.

use super::container::PluginContainer;
use crate::command::{CommandSpec, CommandState, Interceptor};
use crate::config::ConfigBase;
use crate::error::{FrameworkError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

/// Administrative surface for one plugin's commands
pub struct CommandHandler {
    container: Weak<PluginContainer>,
}

impl CommandHandler {
    pub(crate) fn new(container: &Arc<PluginContainer>) -> Self {
        Self {
            container: Arc::downgrade(container),
        }
    }

    fn container(&self) -> Result<Arc<PluginContainer>> {
        self.container
            .upgrade()
            .ok_or_else(|| FrameworkError::UnknownPlugin("<dropped>".to_string()))
    }

    pub fn state(&self, key: &str) -> Option<CommandState> {
        self.container.upgrade().and_then(|c| c.state(key))
    }

    pub fn set_state(&self, key: &str, state: CommandState) -> Result<()> {
        self.container()?.set_state(key, state)
    }

    /// Attach an interceptor to the given commands
    pub fn add_interceptor(&self, interceptor: Interceptor, keys: &[&str]) -> Result<()> {
        let container = self.container()?;
        for key in keys {
            container.add_interceptor(key, interceptor.clone())?;
        }
        Ok(())
    }

    /// Attach an interceptor to every command except the excluded keys
    pub fn add_interceptor_for_all_except(
        &self,
        interceptor: Interceptor,
        excluded: &[&str],
    ) -> Result<()> {
        self.container()?
            .add_interceptor_for_all_except(&interceptor, excluded);
        Ok(())
    }

    pub fn remove_interceptors(&self, key: &str) -> Result<()> {
        self.container()?.remove_interceptors(key)
    }
}

/// Plugin-scoped config access
pub struct ConfigHandler {
    base: ConfigBase,
    owner: String,
}

impl ConfigHandler {
    pub(crate) fn new(base: ConfigBase, owner: impl Into<String>) -> Self {
        Self {
            base,
            owner: owner.into(),
        }
    }

    /// On-disk path of a named config
    pub fn path(&self, name: &str, shared: bool) -> PathBuf {
        self.base.resolve(&self.owner, shared, name)
    }

    /// Load a typed config, creating it from `populate` on first use
    pub fn load_or_create<T, F>(&self, name: &str, shared: bool, populate: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.path(name, shared);
        self.base.load_or_create(&path, populate)
    }
}

/// Renders a help listing from a plugin's registered commands
pub struct HelpProvider {
    container: Weak<PluginContainer>,
}

impl HelpProvider {
    pub(crate) fn new(container: &Arc<PluginContainer>) -> Self {
        Self {
            container: Arc::downgrade(container),
        }
    }

    /// One line per command, children indented under their parents
    pub fn render(&self) -> String {
        let Some(container) = self.container.upgrade() else {
            return String::new();
        };

        let mut specs = container.top_level_specs();
        specs.sort_by(|a, b| a.primary_alias().cmp(b.primary_alias()));

        let mut out = String::new();
        for spec in &specs {
            Self::push_line(&mut out, spec, None);

            let mut children: Vec<&CommandSpec> = spec.children().iter().collect();
            children.sort_by(|a, b| a.primary_alias().cmp(b.primary_alias()));
            for child in children {
                Self::push_line(&mut out, child, Some(spec.primary_alias()));
            }
        }
        out
    }

    fn push_line(out: &mut String, spec: &CommandSpec, parent: Option<&str>) {
        if parent.is_some() {
            out.push_str("  ");
        }
        match spec.usage() {
            Some(usage) => out.push_str(usage),
            None => match parent {
                Some(parent) => {
                    out.push('/');
                    out.push_str(parent);
                    out.push(' ');
                    out.push_str(spec.primary_alias());
                }
                None => {
                    out.push('/');
                    out.push_str(spec.primary_alias());
                }
            },
        }
        if let Some(description) = spec.description() {
            out.push_str(" - ");
            out.push_str(description);
        }
        out.push('\n');
    }
}
