//! Host event bus seam
//!
//! Listener registrations are forwarded to the host verbatim; event dispatch
//! itself is entirely the host's concern.

use anyhow::Result;
use std::sync::Arc;

/// Listener callback; the payload shape is host-defined
pub type EventHandlerFn = dyn Fn(&serde_json::Value) + Send + Sync;

/// Host side of listener registration
pub trait EventBus: Send + Sync {
    fn subscribe(&self, event: &str, handler: Arc<EventHandlerFn>) -> Result<()>;
}

/// Bus that accepts every subscription and only logs it
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn subscribe(&self, event: &str, _handler: Arc<EventHandlerFn>) -> Result<()> {
        tracing::debug!("Subscribed listener for event '{}'", event);
        Ok(())
    }
}
