//! Subscription plan entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{PlanId, ValidationError};

use super::PlanDuration;

/// Pricing and period for an introductory phase of a plan.
///
/// Same shape as the regular price/duration pair; applied to the first
/// period(s) of a subscription when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroductoryOffer {
    pub price_cents: i64,
    pub duration: PlanDuration,
}

/// A named, priced, duration-bearing billing template.
///
/// All prices are in minor currency units (cents). The `name_key` doubles
/// as the unique lookup key and the translation key in the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    id: PlanId,
    name_key: String,
    price_cents: i64,
    duration: PlanDuration,
    introductory: Option<IntroductoryOffer>,
}

impl Plan {
    /// Creates a plan.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `name_key` is blank
    /// - `BelowMinimum` if `price_cents` is negative
    pub fn new(
        id: PlanId,
        name_key: impl Into<String>,
        price_cents: i64,
        duration: PlanDuration,
    ) -> Result<Self, ValidationError> {
        let name_key = name_key.into();
        if name_key.trim().is_empty() {
            return Err(ValidationError::empty_field("name_key"));
        }
        if price_cents < 0 {
            return Err(ValidationError::below_minimum("price_cents", 0, price_cents));
        }
        Ok(Self {
            id,
            name_key,
            price_cents,
            duration,
            introductory: None,
        })
    }

    /// Attaches an introductory price/duration to this plan.
    ///
    /// # Errors
    ///
    /// `BelowMinimum` if the introductory price is negative.
    pub fn with_introductory_offer(
        mut self,
        price_cents: i64,
        duration: PlanDuration,
    ) -> Result<Self, ValidationError> {
        if price_cents < 0 {
            return Err(ValidationError::below_minimum(
                "introductory_price_cents",
                0,
                price_cents,
            ));
        }
        self.introductory = Some(IntroductoryOffer {
            price_cents,
            duration,
        });
        Ok(self)
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn duration(&self) -> PlanDuration {
        self.duration
    }

    pub fn introductory(&self) -> Option<&IntroductoryOffer> {
        self.introductory.as_ref()
    }

    /// Human-readable name derived from the name key.
    ///
    /// The host application owns the real translation table; this is the
    /// fallback ("basic.monthly" becomes "Basic monthly").
    pub fn name(&self) -> String {
        let humanized: String = self
            .name_key
            .chars()
            .map(|c| if c == '.' || c == '_' { ' ' } else { c })
            .collect();
        let mut chars = humanized.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => humanized,
        }
    }

    /// Price in major currency units.
    pub fn price(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name(), self.price())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly() -> PlanDuration {
        "1m".parse().unwrap()
    }

    #[test]
    fn creates_plan_with_valid_fields() {
        let plan = Plan::new(PlanId::new(), "basic.monthly", 799, monthly()).unwrap();
        assert_eq!(plan.name_key(), "basic.monthly");
        assert_eq!(plan.price_cents(), 799);
        assert!(plan.introductory().is_none());
    }

    #[test]
    fn rejects_blank_name_key() {
        assert!(Plan::new(PlanId::new(), "  ", 799, monthly()).is_err());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(Plan::new(PlanId::new(), "basic", -1, monthly()).is_err());
    }

    #[test]
    fn allows_free_plans() {
        let plan = Plan::new(PlanId::new(), "free", 0, monthly()).unwrap();
        assert_eq!(plan.price_cents(), 0);
    }

    #[test]
    fn introductory_offer_keeps_own_price_and_duration() {
        let plan = Plan::new(PlanId::new(), "pro.yearly", 9900, "1y".parse().unwrap())
            .unwrap()
            .with_introductory_offer(4900, "3m".parse().unwrap())
            .unwrap();
        let intro = plan.introductory().unwrap();
        assert_eq!(intro.price_cents, 4900);
        assert_eq!(intro.duration.to_string(), "3m");
    }

    #[test]
    fn name_humanizes_the_key() {
        let plan = Plan::new(PlanId::new(), "basic.monthly", 799, monthly()).unwrap();
        assert_eq!(plan.name(), "Basic monthly");
    }

    #[test]
    fn display_shows_name_and_major_units() {
        let plan = Plan::new(PlanId::new(), "basic", 799, monthly()).unwrap();
        assert_eq!(plan.to_string(), "Basic - 7.99");
    }
}
