//! Ports layer - boundaries between the engine and its collaborators.
//!
//! - `SubscriptionStore` - durable persistence (consumed)
//! - `SubscriptionListener` - lifecycle observers (exposed to integrators)
//! - `Clock` - time source

mod clock;
mod subscription_listener;
mod subscription_store;

pub use clock::Clock;
pub use subscription_listener::SubscriptionListener;
pub use subscription_store::SubscriptionStore;
