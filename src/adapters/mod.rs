//! Adapters layer - concrete implementations of the ports.
//!
//! - `InMemorySubscriptionStore` - deterministic store for tests/examples
//! - `SystemClock` / `ManualClock` - time sources
//! - `LoggingListener` - tracing-backed default observer

mod clock;
mod in_memory_store;
mod logging_listener;

pub use clock::{ManualClock, SystemClock};
pub use in_memory_store::InMemorySubscriptionStore;
pub use logging_listener::LoggingListener;
