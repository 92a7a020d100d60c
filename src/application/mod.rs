//! Application layer - workflow orchestration over the domain.
//!
//! - `manager` - the subscription manager driving renewals, grace periods
//!   and cancellations
//! - `notifications` - listener fan-out with per-listener failure isolation

mod manager;
mod notifications;

pub use manager::{SubscriptionManager, SweepReport};
pub use notifications::{Notification, NotificationDispatcher, NotificationFailure};
