//! Subscription aggregate entity.
//!
//! A customer's enrollment in a plan, tracked through the status lifecycle
//! and billing periods. The aggregate exclusively owns its event trail:
//! events are appended through it and share its lifetime, so deleting a
//! subscription deletes its history with it.
//!
//! # Design Decisions
//!
//! - **No raw status setter**: every status change funnels through the
//!   guarded/strict transition methods, which consult the transition table
//!   and append the `status_change` audit event.
//! - **Money in cents**: all monetary values are i64 minor units.
//! - **Periods are optional until started**: `current_period_*` stay unset
//!   until the first period runs, so the first renewal anchors on
//!   `start_date`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{
    CustomerId, DomainError, StateMachine, SubscriptionId, Timestamp, ValidationError,
};
use crate::domain::plan::Plan;

use super::{EventType, SubscriptionEvent, SubscriptionStatus};

/// Subscription aggregate.
///
/// # Invariants
///
/// - `end_date`, when present, is strictly after `start_date`
/// - `canceled_at` is never set without a `cancellation_reason`
/// - `status` only changes along edges of the transition table
/// - every successful transition leaves one `status_change` event behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    id: SubscriptionId,
    customer_id: CustomerId,
    plan: Plan,
    status: SubscriptionStatus,
    start_date: Timestamp,
    end_date: Option<Timestamp>,
    trial_end_date: Option<Timestamp>,
    current_period_start: Option<Timestamp>,
    current_period_end: Option<Timestamp>,
    canceled_at: Option<Timestamp>,
    cancellation_reason: Option<String>,
    events: Vec<SubscriptionEvent>,
}

impl Subscription {
    /// Creates a subscription in `Pending` with no billing period yet.
    pub fn new(id: SubscriptionId, customer_id: CustomerId, plan: Plan, start_date: Timestamp) -> Self {
        Self {
            id,
            customer_id,
            plan,
            status: SubscriptionStatus::Pending,
            start_date,
            end_date: None,
            trial_end_date: None,
            current_period_start: None,
            current_period_end: None,
            canceled_at: None,
            cancellation_reason: None,
            events: Vec::new(),
        }
    }

    /// Sets a fixed end date.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if the end date is not after the start date.
    pub fn with_end_date(mut self, end_date: Timestamp) -> Result<Self, ValidationError> {
        if end_date <= self.start_date {
            return Err(ValidationError::invalid_format(
                "end_date",
                "must be after the start date",
            ));
        }
        self.end_date = Some(end_date);
        Ok(self)
    }

    /// Sets the trial end date.
    pub fn with_trial_end_date(mut self, trial_end_date: Timestamp) -> Self {
        self.trial_end_date = Some(trial_end_date);
        self
    }

    // === Accessors ===

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn start_date(&self) -> Timestamp {
        self.start_date
    }

    pub fn end_date(&self) -> Option<Timestamp> {
        self.end_date
    }

    pub fn trial_end_date(&self) -> Option<Timestamp> {
        self.trial_end_date
    }

    pub fn current_period_start(&self) -> Option<Timestamp> {
        self.current_period_start
    }

    pub fn current_period_end(&self) -> Option<Timestamp> {
        self.current_period_end
    }

    pub fn canceled_at(&self) -> Option<Timestamp> {
        self.canceled_at
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Full event trail, oldest first.
    pub fn events(&self) -> &[SubscriptionEvent] {
        &self.events
    }

    /// Events of one type, oldest first.
    pub fn events_of_type(&self, event_type: EventType) -> impl Iterator<Item = &SubscriptionEvent> {
        self.events
            .iter()
            .filter(move |e| e.event_type() == event_type)
    }

    // === State machine ===

    /// Pure predicate: is the move to `target` legal from the current
    /// status? Table lookup, no side effects.
    pub fn can_transition_to(&self, target: SubscriptionStatus) -> bool {
        self.status.can_transition_to(&target)
    }

    /// Guarded transition: applies the status change only if legal.
    ///
    /// Returns `true` and appends a `status_change` event on success;
    /// returns `false` and leaves the aggregate untouched otherwise. The
    /// silent no-op is the idempotency guard sweeps rely on.
    #[must_use]
    pub fn transition_to(&mut self, target: SubscriptionStatus) -> bool {
        if !self.can_transition_to(target) {
            return false;
        }
        self.events
            .push(SubscriptionEvent::status_change(self.id, self.status, target));
        self.status = target;
        true
    }

    /// Strict transition: like `transition_to` but an illegal move is a
    /// hard `InvalidTransition` error.
    pub fn try_transition_to(&mut self, target: SubscriptionStatus) -> Result<(), DomainError> {
        if self.transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.status, target))
        }
    }

    // === Period management ===

    /// Advances the billing period: the new period starts where the last
    /// one ended (or at `start_date` if none has run) and spans one plan
    /// duration.
    ///
    /// Only renewal and start paths may call this; cancellation and expiry
    /// never touch the period.
    pub(crate) fn start_new_period(&mut self) -> Result<(), DomainError> {
        let new_start = self.current_period_end.unwrap_or(self.start_date);
        let new_end = self.plan.duration().add_to(new_start)?;
        self.current_period_start = Some(new_start);
        self.current_period_end = Some(new_end);
        Ok(())
    }

    // === Lifecycle helpers (driven by the manager) ===

    /// Marks the subscription canceled, immediately or at period end.
    ///
    /// Guarded: returns `Ok(false)` without side effects when the current
    /// status does not allow cancellation.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if `reason` is blank; a cancellation must carry
    /// its reason.
    pub(crate) fn cancel(
        &mut self,
        reason: &str,
        at_period_end: bool,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::validation(
                "cancellation_reason",
                "must be present when canceling",
            ));
        }
        let target = if at_period_end {
            SubscriptionStatus::PendingCancellation
        } else {
            SubscriptionStatus::Canceled
        };
        if !self.can_transition_to(target) {
            return Ok(false);
        }

        self.canceled_at = Some(if at_period_end {
            self.current_period_end.unwrap_or(now)
        } else {
            now
        });
        self.cancellation_reason = Some(reason.to_owned());
        self.events
            .push(SubscriptionEvent::cancellation(self.id, reason, at_period_end));
        // Cannot fail: the guard above already passed.
        let _ = self.transition_to(target);
        Ok(true)
    }

    /// Swaps the plan immediately, recording a `plan_change` event.
    ///
    /// Scheduling a change for the next renewal is not supported; the
    /// reserved `PendingChange` status stays unused.
    pub fn change_plan(&mut self, new_plan: Plan) {
        if new_plan.id() == self.plan.id() {
            return;
        }
        self.events
            .push(SubscriptionEvent::plan_change(self.id, self.plan.id(), new_plan.id()));
        self.plan = new_plan;
    }

    /// Appends a renewal audit record. Called by the manager after a
    /// successful period advance.
    pub(crate) fn log_renewal(
        &mut self,
        price_cents: i64,
        renewed_from: Timestamp,
        renewed_until: Timestamp,
    ) {
        self.events.push(SubscriptionEvent::renewal(
            self.id,
            price_cents,
            renewed_from,
            renewed_until,
        ));
    }

    /// Appends a free-form event supplied by the host application.
    pub fn log_custom_event(&mut self, metadata: Map<String, Value>) {
        self.events.push(SubscriptionEvent::custom(self.id, metadata));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, PlanId};

    fn monthly_plan() -> Plan {
        Plan::new(PlanId::new(), "basic.monthly", 1000, "1m".parse().unwrap()).unwrap()
    }

    fn pending_subscription() -> Subscription {
        Subscription::new(
            SubscriptionId::new(),
            CustomerId::new("customer-1").unwrap(),
            monthly_plan(),
            Timestamp::from_ymd(2026, 1, 1).unwrap(),
        )
    }

    fn active_subscription() -> Subscription {
        let mut sub = pending_subscription();
        assert!(sub.transition_to(SubscriptionStatus::Active));
        sub.start_new_period().unwrap();
        sub
    }

    // Construction and validation

    #[test]
    fn new_subscription_is_pending_with_no_period() {
        let sub = pending_subscription();
        assert_eq!(sub.status(), SubscriptionStatus::Pending);
        assert!(sub.current_period_start().is_none());
        assert!(sub.current_period_end().is_none());
        assert!(sub.events().is_empty());
    }

    #[test]
    fn end_date_must_follow_start_date() {
        let start = Timestamp::from_ymd(2026, 1, 1).unwrap();
        let sub = pending_subscription();
        assert!(sub.clone().with_end_date(start).is_err());
        assert!(sub.clone().with_end_date(start.minus_days(1)).is_err());
        assert!(sub.with_end_date(start.add_days(30)).is_ok());
    }

    // Guarded / strict transitions

    #[test]
    fn guarded_transition_applies_legal_move_and_logs_it() {
        let mut sub = pending_subscription();
        assert!(sub.transition_to(SubscriptionStatus::Trial));
        assert_eq!(sub.status(), SubscriptionStatus::Trial);

        let changes: Vec<_> = sub.events_of_type(EventType::StatusChange).collect();
        assert_eq!(changes.len(), 1);
        let view = changes[0].as_status_change().unwrap();
        assert_eq!(view.from(), Some(SubscriptionStatus::Pending));
        assert_eq!(view.to(), Some(SubscriptionStatus::Trial));
    }

    #[test]
    fn guarded_transition_is_a_silent_noop_when_illegal() {
        let mut sub = pending_subscription();
        assert!(!sub.transition_to(SubscriptionStatus::Canceled));
        assert_eq!(sub.status(), SubscriptionStatus::Pending);
        assert!(sub.events().is_empty());
    }

    #[test]
    fn strict_transition_surfaces_invalid_transition() {
        let mut sub = pending_subscription();
        let err = sub
            .try_transition_to(SubscriptionStatus::PastDue)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(sub.status(), SubscriptionStatus::Pending);
    }

    #[test]
    fn repeated_guarded_transition_logs_exactly_once() {
        let mut sub = pending_subscription();
        assert!(sub.transition_to(SubscriptionStatus::ProcessingRenewal));
        assert!(!sub.transition_to(SubscriptionStatus::ProcessingRenewal));
        assert_eq!(sub.events_of_type(EventType::StatusChange).count(), 1);
    }

    // Period advance

    #[test]
    fn first_period_anchors_on_start_date() {
        let sub = active_subscription();
        assert_eq!(sub.current_period_start(), Some(sub.start_date()));
        assert_eq!(
            sub.current_period_end(),
            Some(Timestamp::from_ymd(2026, 2, 1).unwrap())
        );
    }

    #[test]
    fn next_period_starts_where_the_last_ended() {
        let mut sub = active_subscription();
        sub.start_new_period().unwrap();
        assert_eq!(
            sub.current_period_start(),
            Some(Timestamp::from_ymd(2026, 2, 1).unwrap())
        );
        assert_eq!(
            sub.current_period_end(),
            Some(Timestamp::from_ymd(2026, 3, 1).unwrap())
        );
    }

    // Cancellation

    #[test]
    fn cancel_at_period_end_parks_in_pending_cancellation() {
        let mut sub = active_subscription();
        let period_end = sub.current_period_end().unwrap();
        let now = Timestamp::from_ymd(2026, 1, 15).unwrap();

        assert!(sub.cancel("Too expensive", true, now).unwrap());
        assert_eq!(sub.status(), SubscriptionStatus::PendingCancellation);
        assert_eq!(sub.canceled_at(), Some(period_end));
        assert_eq!(sub.cancellation_reason(), Some("Too expensive"));

        let cancellations: Vec<_> = sub.events_of_type(EventType::Cancellation).collect();
        assert_eq!(cancellations.len(), 1);
        let view = cancellations[0].as_cancellation().unwrap();
        assert_eq!(view.reason(), Some("Too expensive"));
        assert_eq!(view.at_period_end(), Some(true));
    }

    #[test]
    fn immediate_cancel_stamps_now() {
        let mut sub = active_subscription();
        let now = Timestamp::from_ymd(2026, 1, 15).unwrap();
        assert!(sub.cancel("Fraud", false, now).unwrap());
        assert_eq!(sub.status(), SubscriptionStatus::Canceled);
        assert_eq!(sub.canceled_at(), Some(now));
    }

    #[test]
    fn cancel_requires_a_reason() {
        let mut sub = active_subscription();
        let err = sub.cancel("  ", false, Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(sub.status(), SubscriptionStatus::Active);
        assert!(sub.canceled_at().is_none());
    }

    #[test]
    fn cancel_from_ineligible_status_is_a_noop() {
        let mut sub = pending_subscription();
        assert!(!sub.cancel("reason", false, Timestamp::now()).unwrap());
        assert_eq!(sub.status(), SubscriptionStatus::Pending);
        assert!(sub.cancellation_reason().is_none());
        assert!(sub.events().is_empty());
    }

    // Plan change

    #[test]
    fn change_plan_swaps_plan_and_logs_both_ids() {
        let mut sub = active_subscription();
        let old_id = sub.plan().id();
        let new_plan = Plan::new(PlanId::new(), "pro.monthly", 1500, "1m".parse().unwrap()).unwrap();
        let new_id = new_plan.id();

        sub.change_plan(new_plan);
        assert_eq!(sub.plan().id(), new_id);

        let changes: Vec<_> = sub.events_of_type(EventType::PlanChange).collect();
        assert_eq!(changes.len(), 1);
        let view = changes[0].as_plan_change().unwrap();
        assert_eq!(view.from_plan_id(), Some(old_id));
        assert_eq!(view.to_plan_id(), Some(new_id));
    }

    #[test]
    fn change_plan_to_same_plan_records_nothing() {
        let mut sub = active_subscription();
        let same = sub.plan().clone();
        sub.change_plan(same);
        assert_eq!(sub.events_of_type(EventType::PlanChange).count(), 0);
    }
}
