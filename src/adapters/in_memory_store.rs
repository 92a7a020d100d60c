//! In-memory subscription store for tests and examples.
//!
//! Deterministic, synchronous storage behind the async port. Not meant
//! for production: locks are unwrapped with `.expect()` and nothing is
//! durable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::SubscriptionStore;

/// In-memory store keyed by subscription id.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned. Acceptable for
/// test code; production stores implement the port over a real database.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    // === Test helpers ===

    /// Synchronous read of one record (for test assertions).
    pub fn get(&self, id: &SubscriptionId) -> Option<Subscription> {
        self.records
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .get(id)
            .cloned()
    }

    /// Number of stored subscriptions.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned");
        if records.contains_key(&subscription.id()) {
            return Err(DomainError::validation(
                "id",
                format!("subscription {} already exists", subscription.id()),
            ));
        }
        records.insert(subscription.id(), subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned");
        if !records.contains_key(&subscription.id()) {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("subscription {} not found", subscription.id()),
            ));
        }
        records.insert(subscription.id(), subscription.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_due_for_renewal(
        &self,
        statuses: &[SubscriptionStatus],
        due_at: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned");
        Ok(records
            .values()
            .filter(|sub| statuses.contains(&sub.status()))
            .filter(|sub| {
                sub.current_period_end()
                    .map(|end| end <= due_at)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn find_pending_cancellation(
        &self,
        effective_at: Timestamp,
    ) -> Result<Vec<Subscription>, DomainError> {
        let records = self
            .records
            .read()
            .expect("InMemorySubscriptionStore: lock poisoned");
        Ok(records
            .values()
            .filter(|sub| sub.status() == SubscriptionStatus::PendingCancellation)
            .filter(|sub| {
                sub.canceled_at()
                    .map(|at| at <= effective_at)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemorySubscriptionStore: lock poisoned");
        // Owned events leave with the record: cascade by ownership.
        if records.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("subscription {} not found", id),
            ));
        }
        Ok(())
    }
}
