//! Notification dispatch.
//!
//! Fan-out of lifecycle notifications to registered listeners. Dispatch is
//! synchronous and in registration order, and happens strictly after the
//! triggering transition has been committed. A crash between commit and
//! dispatch drops exactly that one notification; delivery is best-effort
//! at-least-once, not atomic with the store commit.
//!
//! A failing listener never aborts the sweep or starves later listeners:
//! each failure is isolated, logged, and returned to the caller.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionListener;

/// A lifecycle notification, mapped onto one listener capability each.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Created,
    Destroyed,
    Started,
    Canceled { reason: String, immediate: bool },
    DueForRenewal,
    Renewed,
    RenewalPaymentProcessing,
    GracePeriodStarted { days_remaining: i64 },
    Expired,
}

impl Notification {
    /// Stable name, used in logs and failure reports.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Created => "created",
            Notification::Destroyed => "destroyed",
            Notification::Started => "started",
            Notification::Canceled { .. } => "canceled",
            Notification::DueForRenewal => "due_for_renewal",
            Notification::Renewed => "renewed",
            Notification::RenewalPaymentProcessing => "renewal_payment_processing",
            Notification::GracePeriodStarted { .. } => "grace_period_started",
            Notification::Expired => "expired",
        }
    }
}

/// One listener's failure to handle one notification.
#[derive(Debug, Clone)]
pub struct NotificationFailure {
    pub listener: String,
    pub notification: &'static str,
    pub error: DomainError,
}

/// Ordered fan-out of notifications to registered listeners.
///
/// Registration order is delivery order; registrations last for the
/// dispatcher's lifetime.
#[derive(Default)]
pub struct NotificationDispatcher {
    listeners: Vec<Arc<dyn SubscriptionListener>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener at the end of the delivery order.
    pub fn add_listener(&mut self, listener: Arc<dyn SubscriptionListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers `notification` to every listener, isolating failures.
    ///
    /// Each failing listener is logged and collected; later listeners
    /// still receive the notification. The returned failures are for
    /// reporting only — the triggering transition has already committed.
    pub fn notify(
        &self,
        subscription: &Subscription,
        notification: &Notification,
    ) -> Vec<NotificationFailure> {
        let mut failures = Vec::new();
        for listener in &self.listeners {
            let result = match notification {
                Notification::Created => listener.on_subscription_created(subscription),
                Notification::Destroyed => listener.on_subscription_destroyed(subscription),
                Notification::Started => listener.on_subscription_started(subscription),
                Notification::Canceled { reason, immediate } => {
                    listener.on_subscription_canceled(subscription, reason, *immediate)
                }
                Notification::DueForRenewal => {
                    listener.on_subscription_due_for_renewal(subscription)
                }
                Notification::Renewed => listener.on_subscription_renewed(subscription),
                Notification::RenewalPaymentProcessing => {
                    listener.on_subscription_renewal_payment_processing(subscription)
                }
                Notification::GracePeriodStarted { days_remaining } => {
                    listener.on_subscription_grace_period_started(subscription, *days_remaining)
                }
                Notification::Expired => listener.on_subscription_expired(subscription),
            };
            if let Err(error) = result {
                warn!(
                    listener = listener.name(),
                    notification = notification.name(),
                    subscription_id = %subscription.id(),
                    %error,
                    "listener failed to handle notification"
                );
                failures.push(NotificationFailure {
                    listener: listener.name().to_owned(),
                    notification: notification.name(),
                    error,
                });
            }
        }
        failures
    }

    /// Fires the wiring-verification hook on every listener.
    pub fn notify_test_event(&self) -> Vec<NotificationFailure> {
        let mut failures = Vec::new();
        for listener in &self.listeners {
            if let Err(error) = listener.on_test_event_received() {
                warn!(
                    listener = listener.name(),
                    %error,
                    "listener failed to handle test event"
                );
                failures.push(NotificationFailure {
                    listener: listener.name().to_owned(),
                    notification: "test_event",
                    error,
                });
            }
        }
        failures
    }
}
