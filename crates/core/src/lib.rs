//! Kumo plugin support framework
//!
//! Plugins declare commands, config files and event listeners as explicit
//! registration tables; the framework builds per-plugin containers, wires
//! parent/child command trees, indexes everything in a per-application
//! registry, and runs invocations through a phased interceptor pipeline
//! (PRE, START, POST) with per-command enable state and synchronous or
//! asynchronous execution. Everything the host platform owns — command
//! registration, task scheduling, event delivery — crosses a trait seam in
//! [`host`].

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod plugin;

pub use app::{App, FRAMEWORK_ID};
pub use command::{
    ArgumentKind, ArgumentSpec, Command, CommandArgs, CommandDescriptor, CommandDispatcher,
    CommandEntry, CommandExecutor, CommandFailure, CommandRegistry, CommandResult, CommandSource,
    CommandSpec, CommandState, CommandStore, Interceptor, MessageSink, Phase, SourceKind,
};
pub use error::{FrameworkError, Result};
pub use plugin::{
    CommandHandler, CommandRegistration, ConfigHandler, ConfigRegistration, HelpProvider,
    ListenerRegistration, Plugin, PluginContainer, PluginInfo,
};
