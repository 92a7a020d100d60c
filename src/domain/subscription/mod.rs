//! Subscription domain module.
//!
//! The core entity and its satellites: status state machine, owned event
//! trail, and the grace period policy.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `status` - SubscriptionStatus state machine (table-driven)
//! - `events` - Immutable audit events with typed metadata views
//! - `grace` - Grace period policy for failed renewals

mod aggregate;
mod events;
mod grace;
mod status;

pub use aggregate::Subscription;
pub use events::{
    CancellationEvent, EventType, PlanChangeEvent, RenewalEvent, StatusChangeEvent,
    SubscriptionEvent,
};
pub use grace::{GracePolicy, DEFAULT_GRACE_PERIOD_DAYS};
pub use status::{SubscriptionStatus, RENEWAL_ELIGIBLE};
