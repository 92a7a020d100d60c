//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine trait)
//! - `plan` - Billing templates: price, duration, introductory offers
//! - `subscription` - Subscription aggregate, status machine, event trail, grace policy

pub mod foundation;
pub mod plan;
pub mod subscription;
