//! Listener that logs every lifecycle notification.
//!
//! Useful as a default observer during development and as a template for
//! real integrations: override only the callbacks you need.

use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionListener;

/// Logs each notification with structured fields at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl LoggingListener {
    pub fn new() -> Self {
        Self
    }
}

impl SubscriptionListener for LoggingListener {
    fn name(&self) -> &str {
        "logging_listener"
    }

    fn on_test_event_received(&self) -> Result<(), DomainError> {
        info!("test event received");
        Ok(())
    }

    fn on_subscription_created(&self, subscription: &Subscription) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription created");
        Ok(())
    }

    fn on_subscription_destroyed(&self, subscription: &Subscription) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription destroyed");
        Ok(())
    }

    fn on_subscription_started(&self, subscription: &Subscription) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription started");
        Ok(())
    }

    fn on_subscription_canceled(
        &self,
        subscription: &Subscription,
        reason: &str,
        immediate: bool,
    ) -> Result<(), DomainError> {
        info!(
            subscription_id = %subscription.id(),
            reason,
            immediate,
            "subscription canceled"
        );
        Ok(())
    }

    fn on_subscription_due_for_renewal(
        &self,
        subscription: &Subscription,
    ) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription due for renewal");
        Ok(())
    }

    fn on_subscription_renewed(&self, subscription: &Subscription) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription renewed");
        Ok(())
    }

    fn on_subscription_renewal_payment_processing(
        &self,
        subscription: &Subscription,
    ) -> Result<(), DomainError> {
        info!(
            subscription_id = %subscription.id(),
            "renewal payment processing"
        );
        Ok(())
    }

    fn on_subscription_grace_period_started(
        &self,
        subscription: &Subscription,
        days_remaining: i64,
    ) -> Result<(), DomainError> {
        info!(
            subscription_id = %subscription.id(),
            days_remaining,
            "grace period started"
        );
        Ok(())
    }

    fn on_subscription_expired(&self, subscription: &Subscription) -> Result<(), DomainError> {
        info!(subscription_id = %subscription.id(), "subscription expired");
        Ok(())
    }
}
