//! Subscription store port.
//!
//! Defines the contract for durable persistence of subscriptions and their
//! owned event trails. Implementations handle the actual storage.
//!
//! # Design
//!
//! - **Aggregate-level writes**: `update` persists the subscription and its
//!   pending events as one atomic multi-field commit; partial writes would
//!   break the engine's transactional discipline.
//! - **Cascade ownership**: events belong to their subscription, so
//!   deleting a subscription removes its events with it.
//! - **No retries here**: store failures propagate as-is; the periodic
//!   scheduler retries, and transitions are idempotent under re-invocation.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionStatus};

/// Repository port for subscription persistence.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Persist a new subscription.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a subscription with the same id exists
    /// - `StoreError` on persistence failure
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Persist all changes to an existing subscription atomically:
    /// status, dates and appended events commit together or not at all.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `StoreError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Find subscriptions in any of the given statuses whose current
    /// period ends at or before `due_at`. This is the renewal sweep query.
    async fn find_due_for_renewal(
        &self,
        statuses: &[SubscriptionStatus],
        due_at: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Find subscriptions in `PendingCancellation` whose effective
    /// cancellation date is at or before `effective_at`.
    async fn find_pending_cancellation(
        &self,
        effective_at: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Delete a subscription and, by ownership, its whole event trail.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `StoreError` on persistence failure
    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn subscription_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SubscriptionStore) {}
    }
}
