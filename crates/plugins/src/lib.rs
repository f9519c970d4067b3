//! Kumo demo plugins
//!
//! This crate contains plugin implementations for the kumo command framework,
//! exercising parent/child commands, interceptors, async dispatch and config
//! files the way a real host plugin would.

pub mod moderation;
pub mod teleport;

// Re-export core plugin types for convenience
pub use kumo::plugin::{Plugin, PluginInfo};
pub use kumo::{CommandDescriptor, CommandRegistration, CommandResult, CommandState};

// Re-export plugin implementations
pub use moderation::ModerationPlugin;
pub use teleport::TeleportPlugin;
