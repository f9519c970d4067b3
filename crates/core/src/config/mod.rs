//! Configuration storage and registry

pub mod base;
pub mod registry;

pub use base::{ConfigBase, SHARED_DIR};
pub use registry::{ConfigEntry, ConfigRegistry};
