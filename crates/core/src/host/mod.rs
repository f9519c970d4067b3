//! Collaborator seams toward the host platform
//!
//! Everything the framework delegates — command registration, task
//! scheduling, event delivery — crosses one of these traits. Production
//! hosts implement them against their own runtime; tests use the null and
//! manual implementations.

pub mod command_manager;
pub mod event_bus;
pub mod scheduler;

pub use command_manager::{CommandManager, NullCommandManager};
pub use event_bus::{EventBus, EventHandlerFn, NullEventBus};
pub use scheduler::{ManualScheduler, Scheduler, Task, TokioScheduler};
