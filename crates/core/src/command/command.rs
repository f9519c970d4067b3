//! Command entity and executor contract

use super::source::{CommandArgs, CommandSource, SourceKind};
use super::spec::ArgumentSpec;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Declared properties of a command, fixed at registration
///
/// `key` is the stable identity of the command within its owning plugin;
/// parent/child relationships are declared by key, never by structural
/// matching. `aliases` is never empty and `aliases[0]` is the primary alias
/// used as the canonical display and lookup name.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub key: String,
    pub aliases: Vec<String>,
    pub permission: Option<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    pub parent: Option<String>,
    pub is_async: bool,
    pub source: SourceKind,
    pub arguments: Vec<ArgumentSpec>,
}

impl CommandDescriptor {
    /// Create a descriptor with its key and primary alias
    pub fn new(key: impl Into<String>, primary_alias: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            aliases: vec![primary_alias.into()],
            permission: None,
            description: None,
            usage: None,
            parent: None,
            is_async: false,
            source: SourceKind::Any,
            arguments: Vec::new(),
        }
    }

    /// Add a secondary alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the permission string
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the usage string
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Declare the parent command by key
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add an argument to the host-facing argument list
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Mark the command body for asynchronous execution
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Restrict the command to a specific caller kind
    pub fn for_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn primary_alias(&self) -> &str {
        &self.aliases[0]
    }
}

/// Outcome of a command body or interceptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Nothing happened; the caller sees no result
    Empty,
    /// The command completed
    Success,
    /// The command completed and affected `n` targets
    Count(u32),
}

impl CommandResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Failure raised by a command body
#[derive(Debug, Error)]
pub enum CommandFailure {
    /// User-facing failure; the message is relayed to the caller verbatim
    #[error("{0}")]
    Message(String),

    /// Any other failure; logged in full, reduced to a generic caller message
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// User-supplied command body
pub trait CommandExecutor: Send + Sync {
    fn execute(
        &self,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> Result<CommandResult, CommandFailure>;
}

impl<F> CommandExecutor for F
where
    F: Fn(&CommandSource, &CommandArgs) -> Result<CommandResult, CommandFailure> + Send + Sync,
{
    fn execute(
        &self,
        source: &CommandSource,
        args: &CommandArgs,
    ) -> Result<CommandResult, CommandFailure> {
        self(source, args)
    }
}

/// A registered unit of invocable behavior: descriptor plus body
pub struct Command {
    descriptor: CommandDescriptor,
    executor: Arc<dyn CommandExecutor>,
}

impl Command {
    pub fn new(descriptor: CommandDescriptor, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            descriptor,
            executor,
        }
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    pub fn key(&self) -> &str {
        &self.descriptor.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.descriptor.aliases
    }

    pub fn primary_alias(&self) -> &str {
        self.descriptor.primary_alias()
    }

    pub fn is_async(&self) -> bool {
        self.descriptor.is_async
    }

    pub fn required_source(&self) -> SourceKind {
        self.descriptor.source
    }

    pub fn executor(&self) -> &Arc<dyn CommandExecutor> {
        &self.executor
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
