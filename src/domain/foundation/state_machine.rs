//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions, driven by a single transition table per status enum.

use super::DomainError;

/// Trait for status enums that represent state machines.
///
/// Implementors supply one authoritative transition table (destination state
/// to allowed origin states) plus the enumeration of all states; predicate,
/// strict transition and reachability queries are all derived from the table
/// so it stays the single source of truth.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for SubscriptionStatus {
///     fn all() -> &'static [Self] { &ALL_STATUSES }
///
///     fn allowed_origins(target: &Self) -> &'static [Self] {
///         match target {
///             Trial => &[Pending],
///             // ... one arm per destination
///         }
///     }
/// }
///
/// // Usage:
/// let new_status = current_status.transition_to(SubscriptionStatus::Active)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Enumerates every state, in declaration order.
    fn all() -> &'static [Self];

    /// Returns the origin states from which `target` may be entered.
    ///
    /// An empty slice marks `target` as unreachable (reserved states).
    fn allowed_origins(target: &Self) -> &'static [Self];

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        Self::allowed_origins(target).contains(self)
    }

    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }

    /// Performs transition with validation, returning an error if invalid.
    ///
    /// This is the strict form; callers that want a silent no-op on an
    /// illegal move should check `can_transition_to` first.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(self, target))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
