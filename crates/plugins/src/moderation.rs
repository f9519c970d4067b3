//! Moderation plugin
//!
//! A `mod` parent command with `kick` and `ban` children, plus an audit
//! interceptor that can be attached to any of them.

use kumo::{
    ArgumentKind, ArgumentSpec, CommandArgs, CommandDescriptor, CommandExecutor, CommandFailure,
    CommandRegistration, CommandResult, CommandSource, Interceptor, Phase, Plugin, PluginInfo,
};
use std::sync::Arc;

/// Kick and ban commands under a shared `/mod` parent
pub struct ModerationPlugin;

impl ModerationPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ModerationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ModerationPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("moderation", semver::Version::new(1, 0, 0))
            .with_description("Kick and ban commands")
            .with_authors("Kumo Team")
    }

    fn commands(&self) -> Vec<CommandRegistration> {
        let root: Arc<dyn CommandExecutor> =
            Arc::new(|source: &CommandSource, _: &CommandArgs| {
                source.send_message("Moderation tools. Try /mod kick or /mod ban.");
                Ok(CommandResult::Success)
            });

        let kick: Arc<dyn CommandExecutor> =
            Arc::new(|source: &CommandSource, args: &CommandArgs| {
                let Some(player) = args.value("player") else {
                    return Err(CommandFailure::Message(
                        "Specify a player to kick.".to_string(),
                    ));
                };
                tracing::info!("{} kicked {}", source.name(), player);
                source.send_message(&format!("Kicked {player}."));
                Ok(CommandResult::Count(1))
            });

        let ban: Arc<dyn CommandExecutor> =
            Arc::new(|source: &CommandSource, args: &CommandArgs| {
                let Some(player) = args.value("player") else {
                    return Err(CommandFailure::Message(
                        "Specify a player to ban.".to_string(),
                    ));
                };
                let reason = args.value("reason").unwrap_or("Banned by an operator.");
                tracing::info!("{} banned {} ({})", source.name(), player, reason);
                source.send_message(&format!("Banned {player}: {reason}"));
                Ok(CommandResult::Count(1))
            });

        vec![
            CommandRegistration::new(
                CommandDescriptor::new("mod", "mod")
                    .with_description("Moderation tools")
                    .with_usage("/mod <kick|ban>")
                    .with_permission("moderation.use"),
                root,
            ),
            CommandRegistration::new(
                CommandDescriptor::new("kick", "kick")
                    .with_parent("mod")
                    .with_description("Kick a player from the server")
                    .with_permission("moderation.kick")
                    .with_argument(ArgumentSpec::new("player", ArgumentKind::Player)),
                kick,
            ),
            CommandRegistration::new(
                CommandDescriptor::new("ban", "ban")
                    .with_parent("mod")
                    .with_description("Ban a player from the server")
                    .with_permission("moderation.ban")
                    .with_argument(ArgumentSpec::new("player", ArgumentKind::Player))
                    .with_argument(
                        ArgumentSpec::new("reason", ArgumentKind::Remainder).optional(),
                    ),
                ban,
            ),
        ]
    }

    fn on_enable(&self) -> anyhow::Result<()> {
        tracing::info!("Moderation plugin enabled");
        Ok(())
    }
}

/// PRE interceptor that writes an audit line before a command body runs
pub fn audit_interceptor() -> Interceptor {
    Interceptor::new(|source: &CommandSource, args: &CommandArgs| {
        tracing::info!("audit: {} invoked with {:?}", source.name(), args.raw());
        None
    })
    .with_phase(Phase::Pre)
    .with_priority(10)
}
