//! Plugin system for the kumo framework
//!
//! One container per plugin holds everything the framework tracks for it:
//! command stores, interceptor lists, declared configs and listeners, and
//! the administrative handlers installed during registration.

pub mod container;
pub mod handler;
pub mod plugin;

// Re-export core types
pub use container::PluginContainer;
pub use handler::{CommandHandler, ConfigHandler, HelpProvider};
pub use plugin::{
    CommandRegistration, ConfigRegistration, ListenerRegistration, Plugin, PluginInfo,
};
