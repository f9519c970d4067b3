//! Per-command store and enable state

use super::command::Command;
use super::spec::CommandSpec;
use std::fmt;
use std::sync::Arc;

/// Runtime enable state of a registered command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandState {
    Enabled,
    Disabled,
}

impl CommandState {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl Default for CommandState {
    fn default() -> Self {
        Self::Enabled
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "Enabled"),
            Self::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Associates a command with its in-progress spec and resolved parent
///
/// Created once per registered command and kept for the lifetime of the
/// owning plugin container to support runtime enable/disable and state
/// queries. `child_of` is set during second-pass parent resolution; commands
/// without a declared parent stay top-level.
#[derive(Debug)]
pub struct CommandStore {
    command: Arc<Command>,
    spec: CommandSpec,
    child_of: Option<String>,
    state: CommandState,
}

impl CommandStore {
    pub fn new(command: Arc<Command>) -> Self {
        let spec = CommandSpec::from_descriptor(command.descriptor());
        Self {
            command,
            spec,
            child_of: None,
            state: CommandState::default(),
        }
    }

    pub fn command(&self) -> &Arc<Command> {
        &self.command
    }

    pub fn key(&self) -> &str {
        self.command.key()
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut CommandSpec {
        &mut self.spec
    }

    pub fn child_of(&self) -> Option<&str> {
        self.child_of.as_deref()
    }

    pub fn set_child_of(&mut self, parent: impl Into<String>) {
        self.child_of = Some(parent.into());
    }

    /// Whether this command is registered only as a child of its parent
    pub fn is_child(&self) -> bool {
        self.child_of.is_some()
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn set_state(&mut self, state: CommandState) {
        if self.state != state {
            tracing::debug!("Command {} state: {} -> {}", self.key(), self.state, state);
            self.state = state;
        }
    }
}
