//! Grace period policy for failed renewals.
//!
//! A fixed window measured from `current_period_end` during which a
//! subscription with a failed payment stays billable as `PastDue` instead
//! of expiring. The window length comes from configuration; the default is
//! three days. The policy lives outside the state machine so overriding
//! the window never touches transition logic.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::Subscription;

pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 3;

/// Grace window applied after a missed renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePolicy {
    days: i64,
}

impl GracePolicy {
    /// Creates a policy with the given window in days.
    ///
    /// A zero-day window means failed payments expire immediately.
    pub fn new(days: i64) -> Self {
        Self { days: days.max(0) }
    }

    pub fn days(&self) -> i64 {
        self.days
    }

    /// Deadline after which the subscription is no longer in grace, or
    /// `None` when no period has run yet.
    fn deadline(&self, subscription: &Subscription) -> Option<Timestamp> {
        subscription
            .current_period_end()
            .map(|end| end.add_days(self.days))
    }

    /// Eligibility: the status participates in the renewal workflow and a
    /// billing period exists to measure from.
    fn eligible(&self, subscription: &Subscription) -> bool {
        subscription.status().is_renewal_eligible() && subscription.current_period_end().is_some()
    }

    /// True while a failed payment may still be retried.
    pub fn in_grace_period(&self, subscription: &Subscription, now: Timestamp) -> bool {
        match self.deadline(subscription) {
            Some(deadline) if self.eligible(subscription) => now <= deadline,
            _ => false,
        }
    }

    /// Whole days left in the grace window, clamped to zero when the
    /// subscription is not eligible or the window has passed.
    pub fn days_remaining(&self, subscription: &Subscription, now: Timestamp) -> i64 {
        if !self.in_grace_period(subscription, now) {
            return 0;
        }
        match self.deadline(subscription) {
            Some(deadline) => deadline.duration_since(&now).num_days().max(0),
            None => 0,
        }
    }

    /// True once the window has passed; the subscription should expire.
    pub fn exceeded(&self, subscription: &Subscription, now: Timestamp) -> bool {
        match self.deadline(subscription) {
            Some(deadline) if self.eligible(subscription) => now.is_after(&deadline),
            _ => false,
        }
    }
}

impl Default for GracePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, PlanId, SubscriptionId};
    use crate::domain::plan::Plan;
    use crate::domain::subscription::SubscriptionStatus;

    fn subscription_with_period_end() -> (Subscription, Timestamp) {
        let plan = Plan::new(PlanId::new(), "basic.monthly", 1000, "1m".parse().unwrap()).unwrap();
        let mut sub = Subscription::new(
            SubscriptionId::new(),
            CustomerId::new("c-1").unwrap(),
            plan,
            Timestamp::from_ymd(2026, 1, 1).unwrap(),
        );
        assert!(sub.transition_to(SubscriptionStatus::Active));
        sub.start_new_period().unwrap();
        (sub.clone(), sub.current_period_end().unwrap())
    }

    #[test]
    fn default_window_is_three_days() {
        assert_eq!(GracePolicy::default().days(), DEFAULT_GRACE_PERIOD_DAYS);
    }

    #[test]
    fn in_grace_just_inside_the_boundary() {
        let (sub, period_end) = subscription_with_period_end();
        let policy = GracePolicy::default();

        // ~2.99 days after period end: still in grace
        let just_inside = period_end.add_days(2).add_hours(23).add_minutes(45);
        assert!(policy.in_grace_period(&sub, just_inside));

        // ~3.01 days after: out
        let just_outside = period_end.add_days(3).add_minutes(15);
        assert!(!policy.in_grace_period(&sub, just_outside));
        assert!(policy.exceeded(&sub, just_outside));
    }

    #[test]
    fn days_remaining_counts_down() {
        let (sub, period_end) = subscription_with_period_end();
        let policy = GracePolicy::default();

        assert_eq!(policy.days_remaining(&sub, period_end), 3);
        assert_eq!(policy.days_remaining(&sub, period_end.add_days(1)), 2);
        assert_eq!(policy.days_remaining(&sub, period_end.add_days(3)), 0);
        assert_eq!(policy.days_remaining(&sub, period_end.add_days(10)), 0);
    }

    #[test]
    fn ineligible_status_is_never_in_grace() {
        let (mut sub, period_end) = subscription_with_period_end();
        assert!(sub.cancel("done", false, period_end).unwrap());
        let policy = GracePolicy::default();

        assert!(!policy.in_grace_period(&sub, period_end));
        assert!(!policy.exceeded(&sub, period_end.add_days(10)));
        assert_eq!(policy.days_remaining(&sub, period_end), 0);
    }

    #[test]
    fn no_period_means_no_grace() {
        let plan = Plan::new(PlanId::new(), "basic", 1000, "1m".parse().unwrap()).unwrap();
        let sub = Subscription::new(
            SubscriptionId::new(),
            CustomerId::new("c-2").unwrap(),
            plan,
            Timestamp::now(),
        );
        let policy = GracePolicy::default();
        assert!(!policy.in_grace_period(&sub, Timestamp::now()));
        assert!(!policy.exceeded(&sub, Timestamp::now()));
    }

    #[test]
    fn window_length_is_overridable() {
        let (sub, period_end) = subscription_with_period_end();
        let policy = GracePolicy::new(7);

        assert!(policy.in_grace_period(&sub, period_end.add_days(6)));
        assert!(!policy.in_grace_period(&sub, period_end.add_days(8)));
        assert_eq!(policy.days_remaining(&sub, period_end.add_days(2)), 5);
    }

    #[test]
    fn zero_day_window_expires_immediately_after_period_end() {
        let (sub, period_end) = subscription_with_period_end();
        let policy = GracePolicy::new(0);

        assert!(policy.in_grace_period(&sub, period_end));
        assert!(policy.exceeded(&sub, period_end.add_minutes(1)));
    }

    #[test]
    fn negative_window_clamps_to_zero() {
        assert_eq!(GracePolicy::new(-5).days(), 0);
    }
}
