//! Phased command interceptors
//!
//! An interceptor is a callback plus placement metadata: the pipeline phase
//! it runs in and a priority (lower sorts first). Interceptors are registered
//! as plain values; there is no runtime metadata recovery. A single
//! interceptor may be attached to many commands, sharing one callback.

use super::command::CommandResult;
use super::source::{CommandArgs, CommandSource};
use std::fmt;
use std::sync::Arc;

/// Pipeline phase an interceptor runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Before any state or source check
    Pre,
    /// After the checks, immediately before the command body
    Start,
    /// After the command body completes; results are discarded
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => write!(f, "PRE"),
            Self::Start => write!(f, "START"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Priority assigned when none is given
pub const DEFAULT_PRIORITY: i32 = 1000;

/// Interceptor callback: `Some(result)` stops the pipeline with that result
pub type InterceptorFn =
    dyn Fn(&CommandSource, &CommandArgs) -> Option<CommandResult> + Send + Sync;

/// An interceptor attached to one or more commands
#[derive(Clone)]
pub struct Interceptor {
    phase: Phase,
    priority: i32,
    callback: Arc<InterceptorFn>,
}

impl Interceptor {
    /// Create an interceptor with the default placement (START, priority 1000)
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&CommandSource, &CommandArgs) -> Option<CommandResult> + Send + Sync + 'static,
    {
        Self {
            phase: Phase::Start,
            priority: DEFAULT_PRIORITY,
            callback: Arc::new(callback),
        }
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn run(&self, source: &CommandSource, args: &CommandArgs) -> Option<CommandResult> {
        (self.callback)(source, args)
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("phase", &self.phase)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
