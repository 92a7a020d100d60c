//! Subscription status state machine.
//!
//! One authoritative transition table drives every predicate and transition;
//! no per-pair conditionals exist anywhere else in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Current state of a subscription in its lifecycle.
///
/// `Paused` and `PendingChange` are reserved: the table gives them no
/// origins, so any attempt to transition into them is rejected.
///
/// `Expired` deliberately covers both "grace period exceeded" and
/// "cancellation reached its effective date". Both mean "no longer
/// billable"; the event trail disambiguates which path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created but not yet started.
    Pending,

    /// In a trial period.
    Trial,

    /// Currently active and paid.
    Active,

    /// Payment failed but still inside the grace period.
    PastDue,

    /// Will be canceled at period end.
    PendingCancellation,

    /// A renewal attempt is underway.
    ProcessingRenewal,

    /// An asynchronous charge for a renewal is underway.
    ProcessingPayment,

    /// Canceled by the customer or by policy.
    Canceled,

    /// Subscription period ended without renewal.
    Expired,

    /// Reserved: temporarily halted. Not yet implemented.
    Paused,

    /// Reserved: plan change scheduled for next renewal. Not yet implemented.
    PendingChange,
}

use SubscriptionStatus::*;

const ALL_STATUSES: [SubscriptionStatus; 11] = [
    Pending,
    Trial,
    Active,
    PastDue,
    PendingCancellation,
    ProcessingRenewal,
    ProcessingPayment,
    Canceled,
    Expired,
    Paused,
    PendingChange,
];

/// Statuses a renewal sweep considers, and the eligibility set for the
/// grace-period policy.
pub const RENEWAL_ELIGIBLE: [SubscriptionStatus; 5] =
    [Active, Trial, PastDue, ProcessingRenewal, ProcessingPayment];

impl SubscriptionStatus {
    /// True if this status participates in the renewal workflow.
    pub fn is_renewal_eligible(&self) -> bool {
        RENEWAL_ELIGIBLE.contains(self)
    }

    /// Snake-case name, as recorded in `status_change` events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pending => "pending",
            Trial => "trial",
            Active => "active",
            PastDue => "past_due",
            PendingCancellation => "pending_cancellation",
            ProcessingRenewal => "processing_renewal",
            ProcessingPayment => "processing_payment",
            Canceled => "canceled",
            Expired => "expired",
            Paused => "paused",
            PendingChange => "pending_change",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for SubscriptionStatus {
    fn all() -> &'static [Self] {
        &ALL_STATUSES
    }

    /// The transition table: destination state to allowed origin states.
    ///
    /// The graph is intentionally not a DAG: `Canceled` and `Expired` can
    /// re-enter `Pending` or `ProcessingRenewal` to model re-subscription
    /// and retried renewal attempts.
    fn allowed_origins(target: &Self) -> &'static [Self] {
        match target {
            Pending => &[Canceled, Expired],
            Trial => &[Pending],
            Active => &[Pending, Trial, ProcessingRenewal, ProcessingPayment],
            PastDue => &[Active, ProcessingRenewal, ProcessingPayment],
            PendingCancellation => &[Active, Trial],
            ProcessingRenewal => &[Pending, Trial, Active, PastDue, Canceled, Expired],
            ProcessingPayment => &[ProcessingRenewal],
            Canceled => &[Trial, Active, PendingCancellation, ProcessingPayment],
            Expired => &[
                Trial,
                Active,
                PendingCancellation,
                ProcessingRenewal,
                ProcessingPayment,
            ],
            Paused => &[],
            PendingChange => &[],
        }
    }
}
