//! Command metadata, registry and dispatch pipeline
//!
//! The core of the framework: descriptors become commands, commands become
//! stores with parent/child linkage and enable state, the per-application
//! registry indexes them across plugins, and the dispatcher runs invocations
//! through the phased interceptor pipeline.

pub mod command;
pub mod dispatch;
pub mod interceptor;
pub mod registry;
pub mod source;
pub mod spec;
pub mod store;

// Re-export core types
pub use command::{
    Command, CommandDescriptor, CommandExecutor, CommandFailure, CommandResult,
};
pub use dispatch::{CommandDispatcher, DISABLED_MESSAGE, FAILURE_MESSAGE};
pub use interceptor::{Interceptor, InterceptorFn, Phase, DEFAULT_PRIORITY};
pub use registry::{CommandEntry, CommandRegistry, RegistryStats};
pub use source::{CommandArgs, CommandSource, MessageSink, SourceKind};
pub use spec::{ArgumentKind, ArgumentSpec, CommandSpec};
pub use store::{CommandState, CommandStore};
