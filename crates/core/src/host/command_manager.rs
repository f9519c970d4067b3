//! Host command registration seam

use crate::command::CommandSpec;
use anyhow::Result;

/// Host side of command registration
///
/// Called exactly once per top-level command; child commands are reachable
/// only through their parent's spec. The host owns input parsing and result
/// delivery, and calls back into the framework's execute entry point with a
/// resolved (source, args) pair.
pub trait CommandManager: Send + Sync {
    fn register(&self, spec: &CommandSpec, aliases: &[String]) -> Result<()>;
}

/// Manager that accepts every registration and only logs it
///
/// Lets an application run without a real host attached.
pub struct NullCommandManager;

impl CommandManager for NullCommandManager {
    fn register(&self, spec: &CommandSpec, aliases: &[String]) -> Result<()> {
        tracing::debug!(
            "Registered top-level command '{}' with aliases {:?}",
            spec.key(),
            aliases
        );
        Ok(())
    }
}
