//! Teleport plugin
//!
//! A synchronous `spawn` command and an asynchronous `tpa` request command,
//! both player-only, plus a config file created on first run.

use kumo::{
    ArgumentKind, ArgumentSpec, CommandArgs, CommandDescriptor, CommandExecutor, CommandFailure,
    CommandRegistration, CommandResult, CommandSource, ConfigRegistration, Plugin, PluginInfo,
    SourceKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings stored in `config/teleport/teleport.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleportSettings {
    pub request_timeout_secs: u64,
    pub cross_world: bool,
}

impl Default for TeleportSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            cross_world: true,
        }
    }
}

fn default_config() -> toml::Table {
    let mut table = toml::Table::new();
    table.insert("request_timeout_secs".to_string(), toml::Value::Integer(30));
    table.insert("cross_world".to_string(), toml::Value::Boolean(true));
    table
}

/// Spawn teleport and player-to-player teleport requests
pub struct TeleportPlugin;

impl TeleportPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TeleportPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for TeleportPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("teleport", semver::Version::new(1, 1, 0))
            .with_description("Spawn and teleport request commands")
            .with_authors("Kumo Team")
    }

    fn commands(&self) -> Vec<CommandRegistration> {
        let spawn: Arc<dyn CommandExecutor> =
            Arc::new(|source: &CommandSource, _: &CommandArgs| {
                source.send_message("Teleported to spawn.");
                Ok(CommandResult::Success)
            });

        // The request body runs on the host scheduler; the dispatch call
        // answers the player before any of this executes.
        let tpa: Arc<dyn CommandExecutor> =
            Arc::new(|source: &CommandSource, args: &CommandArgs| {
                let Some(target) = args.value("target") else {
                    return Err(CommandFailure::Message(
                        "Specify a player to send the request to.".to_string(),
                    ));
                };
                tracing::debug!("{} requested teleport to {}", source.name(), target);
                source.send_message(&format!("Teleport request sent to {target}."));
                Ok(CommandResult::Success)
            });

        vec![
            CommandRegistration::new(
                CommandDescriptor::new("spawn", "spawn")
                    .with_description("Teleport to the world spawn")
                    .with_permission("teleport.spawn")
                    .for_source(SourceKind::Player),
                spawn,
            ),
            CommandRegistration::new(
                CommandDescriptor::new("tpa", "tpa")
                    .with_alias("tprequest")
                    .with_description("Request a teleport to another player")
                    .with_permission("teleport.request")
                    .with_argument(ArgumentSpec::new("target", ArgumentKind::Player))
                    .for_source(SourceKind::Player)
                    .asynchronous(),
                tpa,
            ),
        ]
    }

    fn configs(&self) -> Vec<ConfigRegistration> {
        vec![ConfigRegistration::new("teleport", default_config)]
    }

    fn on_disable(&self) -> anyhow::Result<()> {
        tracing::info!("Teleport plugin disabled; pending requests dropped");
        Ok(())
    }
}
