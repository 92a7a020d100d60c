//! Subscription listener port.
//!
//! External observers implement any subset of the named callbacks; every
//! method has a default no-op body, so a listener only writes the hooks it
//! cares about. This is the typed rendering of an optional, duck-typed
//! callback interface: an unimplemented capability is simply the inherited
//! no-op, never an error.
//!
//! Callbacks return `Result` so the dispatcher can isolate and report a
//! failing listener without aborting delivery to the rest.

use crate::domain::foundation::DomainError;
use crate::domain::subscription::Subscription;

/// Observer interface for subscription lifecycle notifications.
///
/// Dispatch is synchronous, in registration order, and happens strictly
/// after the triggering transition has been committed to the store — a
/// listener never observes a state the store has not recorded.
pub trait SubscriptionListener: Send + Sync {
    /// Name used when reporting this listener's failures.
    fn name(&self) -> &str {
        "subscription_listener"
    }

    /// Wiring verification hook; carries no subscription.
    fn on_test_event_received(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_created(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_destroyed(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_started(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_canceled(
        &self,
        _subscription: &Subscription,
        _reason: &str,
        _immediate: bool,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    /// Fired by the renewal sweep; the payment integration answers with
    /// one of the manager's payment-outcome calls.
    fn on_subscription_due_for_renewal(
        &self,
        _subscription: &Subscription,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_renewed(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_renewal_payment_processing(
        &self,
        _subscription: &Subscription,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_grace_period_started(
        &self,
        _subscription: &Subscription,
        _days_remaining: i64,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    fn on_subscription_expired(&self, _subscription: &Subscription) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A listener that overrides nothing compiles and inherits no-ops.
    struct Silent;
    impl SubscriptionListener for Silent {}

    #[test]
    fn default_callbacks_are_noops() {
        let listener = Silent;
        assert!(listener.on_test_event_received().is_ok());
        assert_eq!(listener.name(), "subscription_listener");
    }

    #[test]
    fn listener_is_object_safe() {
        fn _accepts_dyn(_listener: &dyn SubscriptionListener) {}
    }
}
