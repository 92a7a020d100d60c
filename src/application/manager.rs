//! Subscription manager - the renewal/grace-period/cancellation workflow.
//!
//! The only component with the authority to drive a subscription through
//! its lifecycle. Every operation wraps a guarded transition with event
//! logging, one atomic store commit, and post-commit listener dispatch.
//!
//! # Workflow
//!
//! A periodic scheduler calls [`SubscriptionManager::check_subscriptions`].
//! The renewal sweep marks due subscriptions `ProcessingRenewal` and fires
//! `due_for_renewal`; the payment integration answers with one of the
//! payment-outcome methods, which resume the workflow from the processing
//! states. Guard failures are silent no-ops, so repeated or concurrent
//! sweeps reprocess nothing.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp};
use crate::domain::subscription::{
    GracePolicy, Subscription, SubscriptionStatus, RENEWAL_ELIGIBLE,
};
use crate::ports::{Clock, SubscriptionListener, SubscriptionStore};

use super::notifications::{Notification, NotificationDispatcher};

const DEFAULT_RENEWAL_BATCH_SIZE: usize = 100;

/// What one full sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Subscriptions newly marked `ProcessingRenewal`.
    pub due_for_renewal: Vec<SubscriptionId>,
    /// Pending cancellations that reached their effective date.
    pub expired: Vec<SubscriptionId>,
}

/// Orchestrates subscription lifecycles.
///
/// Explicitly constructed and passed by reference from the application's
/// composition root; there is no ambient global instance. The manager owns
/// the listener list (registration lifetime = manager lifetime) but never
/// owns subscriptions — it operates on references supplied by the caller
/// or fetched from the store.
pub struct SubscriptionManager {
    store: Arc<dyn SubscriptionStore>,
    clock: Arc<dyn Clock>,
    grace_policy: GracePolicy,
    renewal_batch_size: usize,
    dispatcher: NotificationDispatcher,
}

impl SubscriptionManager {
    pub fn new(store: Arc<dyn SubscriptionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            grace_policy: GracePolicy::default(),
            renewal_batch_size: DEFAULT_RENEWAL_BATCH_SIZE,
            dispatcher: NotificationDispatcher::new(),
        }
    }

    /// Applies policy knobs from loaded configuration.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.grace_policy = config.billing.grace_policy();
        self.renewal_batch_size = config.billing.renewal_batch_size.max(1) as usize;
        self
    }

    /// Overrides the default 3-day grace window.
    pub fn with_grace_policy(mut self, policy: GracePolicy) -> Self {
        self.grace_policy = policy;
        self
    }

    pub fn grace_policy(&self) -> GracePolicy {
        self.grace_policy
    }

    /// Registers a lifecycle listener. Delivery follows registration order.
    pub fn add_listener(&mut self, listener: Arc<dyn SubscriptionListener>) {
        self.dispatcher.add_listener(listener);
    }

    /// Fires the wiring-verification hook on every registered listener.
    pub fn notify_test_event(&self) {
        self.dispatcher.notify_test_event();
    }

    // === Periodic sweep ===

    /// Entry point for the external scheduler: one renewal sweep plus one
    /// cancellation sweep.
    pub async fn check_subscriptions(&self) -> Result<SweepReport, DomainError> {
        let due_for_renewal = self.check_renewals().await?;
        let expired = self.check_cancellations().await?;
        Ok(SweepReport {
            due_for_renewal,
            expired,
        })
    }

    /// Scans for subscriptions due for renewal and marks each
    /// `ProcessingRenewal`, firing `due_for_renewal` per success.
    ///
    /// Idempotent: subscriptions already in a processing state fail the
    /// guard and are left alone. At most one configured batch is processed
    /// per invocation; the next sweep picks up the remainder.
    pub async fn check_renewals(&self) -> Result<Vec<SubscriptionId>, DomainError> {
        let now = self.clock.now();
        let due = self.store.find_due_for_renewal(&RENEWAL_ELIGIBLE, now).await?;
        info!(candidates = due.len(), "renewal sweep");

        let mut marked = Vec::new();
        for mut subscription in due.into_iter().take(self.renewal_batch_size) {
            if !subscription.transition_to(SubscriptionStatus::ProcessingRenewal) {
                debug!(
                    subscription_id = %subscription.id(),
                    status = %subscription.status(),
                    "skipping: already processing"
                );
                continue;
            }
            self.store.update(&subscription).await?;
            self.dispatcher
                .notify(&subscription, &Notification::DueForRenewal);
            marked.push(subscription.id());
        }
        Ok(marked)
    }

    /// Scans pending cancellations and expires those whose effective date
    /// has passed, firing `expired` per success.
    pub async fn check_cancellations(&self) -> Result<Vec<SubscriptionId>, DomainError> {
        let now = self.clock.now();
        let pending = self.store.find_pending_cancellation(now).await?;
        info!(candidates = pending.len(), "cancellation sweep");

        let mut expired = Vec::new();
        for mut subscription in pending {
            if !subscription.transition_to(SubscriptionStatus::Expired) {
                continue;
            }
            self.store.update(&subscription).await?;
            self.dispatcher
                .notify(&subscription, &Notification::Expired);
            expired.push(subscription.id());
        }
        Ok(expired)
    }

    // === Lifecycle operations ===

    /// Persists a newly created subscription and fires `created`.
    pub async fn create_subscription(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.store.create(subscription).await?;
        self.dispatcher.notify(subscription, &Notification::Created);
        Ok(())
    }

    /// Deletes a subscription (and, by ownership, its event trail) and
    /// fires `destroyed`.
    pub async fn destroy_subscription(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.store.delete(&subscription.id()).await?;
        self.dispatcher
            .notify(subscription, &Notification::Destroyed);
        Ok(())
    }

    /// Activates a subscription and opens its first billing period.
    ///
    /// Returns `false` without side effects if the subscription cannot
    /// move to `Active` from its current status.
    pub async fn start_subscription(&self, subscription: &mut Subscription) -> Result<bool, DomainError> {
        if !subscription.transition_to(SubscriptionStatus::Active) {
            return Ok(false);
        }
        subscription.start_new_period()?;
        self.store.update(subscription).await?;
        info!(subscription_id = %subscription.id(), "subscription started");
        self.dispatcher.notify(subscription, &Notification::Started);
        Ok(true)
    }

    /// Cancels a subscription, immediately or at period end.
    ///
    /// At period end: parks in `PendingCancellation` with `canceled_at` set
    /// to the period end; the cancellation sweep finishes the job.
    /// Immediate: moves straight to `Canceled` with `canceled_at = now`.
    pub async fn cancel_subscription(
        &self,
        subscription: &mut Subscription,
        reason: &str,
        at_period_end: bool,
    ) -> Result<bool, DomainError> {
        let now = self.clock.now();
        if !subscription.cancel(reason, at_period_end, now)? {
            return Ok(false);
        }
        self.store.update(subscription).await?;
        info!(
            subscription_id = %subscription.id(),
            at_period_end,
            "subscription canceled"
        );
        self.dispatcher.notify(
            subscription,
            &Notification::Canceled {
                reason: reason.to_owned(),
                immediate: !at_period_end,
            },
        );
        Ok(true)
    }

    // === Payment integration boundary ===

    /// Renewal that requires no charge (free plans, credit on file).
    pub async fn no_payment_needed_for_renewal(
        &self,
        subscription: &mut Subscription,
    ) -> Result<bool, DomainError> {
        self.renew(subscription).await
    }

    /// Asynchronous charge came back successful.
    pub async fn payment_successful_for_renewal(
        &self,
        subscription: &mut Subscription,
    ) -> Result<bool, DomainError> {
        self.renew(subscription).await
    }

    /// The payment integration has started an asynchronous charge.
    pub async fn processing_payment_for_renewal(
        &self,
        subscription: &mut Subscription,
    ) -> Result<bool, DomainError> {
        if !subscription.transition_to(SubscriptionStatus::ProcessingPayment) {
            return Ok(false);
        }
        self.store.update(subscription).await?;
        self.dispatcher
            .notify(subscription, &Notification::RenewalPaymentProcessing);
        Ok(true)
    }

    /// The charge failed: enter the grace period, or expire once the
    /// window has passed.
    pub async fn payment_failed_for_renewal(
        &self,
        subscription: &mut Subscription,
    ) -> Result<bool, DomainError> {
        let now = self.clock.now();
        if self.grace_policy.in_grace_period(subscription, now) {
            if !subscription.transition_to(SubscriptionStatus::PastDue) {
                return Ok(false);
            }
            let days_remaining = self.grace_policy.days_remaining(subscription, now);
            self.store.update(subscription).await?;
            info!(
                subscription_id = %subscription.id(),
                days_remaining,
                "payment failed, grace period started"
            );
            self.dispatcher.notify(
                subscription,
                &Notification::GracePeriodStarted { days_remaining },
            );
        } else {
            if !subscription.transition_to(SubscriptionStatus::Expired) {
                return Ok(false);
            }
            self.store.update(subscription).await?;
            info!(
                subscription_id = %subscription.id(),
                "payment failed outside grace period, subscription expired"
            );
            self.dispatcher
                .notify(subscription, &Notification::Expired);
        }
        Ok(true)
    }

    /// Common tail of the two successful-renewal paths: activate, advance
    /// the period, log the renewal, fire `renewed`.
    async fn renew(&self, subscription: &mut Subscription) -> Result<bool, DomainError> {
        let renewed_from = subscription
            .current_period_end()
            .unwrap_or(subscription.start_date());
        if !subscription.transition_to(SubscriptionStatus::Active) {
            return Ok(false);
        }
        subscription.start_new_period()?;
        let renewed_until = subscription.current_period_end().ok_or_else(|| {
            DomainError::new(ErrorCode::PeriodNotStarted, "period advance left no period end")
        })?;
        subscription.log_renewal(
            subscription.plan().price_cents(),
            renewed_from,
            renewed_until,
        );
        self.store.update(subscription).await?;
        info!(
            subscription_id = %subscription.id(),
            renewed_until = %renewed_until,
            "subscription renewed"
        );
        self.dispatcher.notify(subscription, &Notification::Renewed);
        Ok(true)
    }

    /// Exposes the clock for callers that need the manager's notion of now.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
