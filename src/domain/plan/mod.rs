//! Plan domain module.
//!
//! Billing templates: price, period length and optional introductory offer.

mod duration;
mod plan;

pub use duration::{DurationUnit, PlanDuration};
pub use plan::{IntroductoryOffer, Plan};
