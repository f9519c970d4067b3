//! Command specification builder
//!
//! A [`CommandSpec`] is the registration object handed to the host command
//! manager: the command's display metadata, its argument list, and the specs
//! of any child commands wired under it. Absent metadata stays absent; an
//! unset description is never turned into an empty string.

use super::command::CommandDescriptor;

/// Host-facing argument value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// A single word
    Word,
    Integer,
    Boolean,
    /// An online player name
    Player,
    /// Everything up to the end of the input
    Remainder,
}

/// One entry in a command's argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgumentKind,
    pub optional: bool,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, kind: ArgumentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Buildable, queryable command registration spec
#[derive(Debug, Clone)]
pub struct CommandSpec {
    key: String,
    aliases: Vec<String>,
    permission: Option<String>,
    description: Option<String>,
    usage: Option<String>,
    arguments: Vec<ArgumentSpec>,
    children: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Seed a spec from a descriptor
    pub fn from_descriptor(descriptor: &CommandDescriptor) -> Self {
        Self {
            key: descriptor.key.clone(),
            aliases: descriptor.aliases.clone(),
            permission: descriptor.permission.clone(),
            description: descriptor.description.clone(),
            usage: descriptor.usage.clone(),
            arguments: descriptor.arguments.clone(),
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn primary_alias(&self) -> &str {
        &self.aliases[0]
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Attach a child command spec, keyed by the child's aliases
    pub fn add_child(&mut self, child: CommandSpec) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[CommandSpec] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Find a child spec by any of its aliases
    pub fn child(&self, alias: &str) -> Option<&CommandSpec> {
        self.children
            .iter()
            .find(|child| child.aliases.iter().any(|a| a == alias))
    }
}
