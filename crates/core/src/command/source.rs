//! Invocation sources and the host reply channel

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Reply channel back to whoever invoked a command
///
/// The host owns the actual transport (chat packet, console line, ...); the
/// framework only ever pushes short user-visible strings through it.
pub trait MessageSink: Send + Sync {
    fn send_message(&self, message: &str);
}

/// Kind of caller a command invocation originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Any caller is accepted
    Any,
    /// An in-game player
    Player,
    /// The server console
    Console,
    /// A command block or equivalent scripted caller
    Block,
}

impl SourceKind {
    /// Check whether a caller of kind `actual` satisfies this requirement
    pub fn accepts(self, actual: SourceKind) -> bool {
        self == SourceKind::Any || self == actual
    }

    /// Fixed user-visible message for a caller that does not satisfy this requirement
    pub fn mismatch_message(self) -> &'static str {
        match self {
            SourceKind::Player => "You must be a player to execute this command!",
            SourceKind::Console => "You must be the console to execute this command!",
            SourceKind::Block => "You must be a command block to execute this command!",
            SourceKind::Any => "",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Player => write!(f, "Player"),
            Self::Console => write!(f, "Console"),
            Self::Block => write!(f, "Block"),
        }
    }
}

/// A resolved invocation source: who is calling, and how to answer them
///
/// Cloning is cheap; async command bodies carry a clone across threads.
#[derive(Clone)]
pub struct CommandSource {
    kind: SourceKind,
    name: String,
    sink: Arc<dyn MessageSink>,
}

impl CommandSource {
    pub fn new(kind: SourceKind, name: impl Into<String>, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            kind,
            name: name.into(),
            sink,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send a user-visible message back to the caller
    pub fn send_message(&self, message: &str) {
        self.sink.send_message(message);
    }
}

impl fmt::Debug for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSource")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Arguments for one invocation, already parsed by the host
///
/// The framework never parses raw input; it only carries named values and the
/// raw token list between the host and the command body.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: HashMap<String, String>,
    raw: Vec<String>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw tokens only, with no named values
    pub fn from_raw<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: HashMap::new(),
            raw: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a named value
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn raw(&self) -> &[String] {
        &self.raw
    }
}
