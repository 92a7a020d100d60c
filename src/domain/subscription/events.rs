//! Subscription event trail.
//!
//! Events are immutable audit records tagged by type, with type-specific
//! structured metadata. One shared record shape carries a metadata map;
//! typed views validate the expected keys lazily on access, so a record
//! with missing or malformed metadata is still readable as a raw event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{EventId, PlanId, SubscriptionId, Timestamp};

use super::SubscriptionStatus;

/// Discriminant for subscription events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Renewal,
    StatusChange,
    PlanChange,
    Cancellation,
    Custom,
}

/// An immutable audit record owned by a subscription.
///
/// Created through the typed constructors; there is no update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    id: EventId,
    subscription_id: SubscriptionId,
    event_type: EventType,
    created_at: Timestamp,
    metadata: Map<String, Value>,
}

impl SubscriptionEvent {
    fn new(
        subscription_id: SubscriptionId,
        event_type: EventType,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            id: EventId::new(),
            subscription_id,
            event_type,
            created_at: Timestamp::now(),
            metadata,
        }
    }

    /// Records a successful renewal.
    pub fn renewal(
        subscription_id: SubscriptionId,
        price_cents: i64,
        renewed_from: Timestamp,
        renewed_until: Timestamp,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("price_cents".into(), price_cents.into());
        metadata.insert("renewed_from".into(), timestamp_value(renewed_from));
        metadata.insert("renewed_until".into(), timestamp_value(renewed_until));
        Self::new(subscription_id, EventType::Renewal, metadata)
    }

    /// Records a status transition.
    pub fn status_change(
        subscription_id: SubscriptionId,
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("from_status".into(), from.as_str().into());
        metadata.insert("to_status".into(), to.as_str().into());
        Self::new(subscription_id, EventType::StatusChange, metadata)
    }

    /// Records a plan change.
    pub fn plan_change(subscription_id: SubscriptionId, from_plan: PlanId, to_plan: PlanId) -> Self {
        let mut metadata = Map::new();
        metadata.insert("from_plan_id".into(), from_plan.to_string().into());
        metadata.insert("to_plan_id".into(), to_plan.to_string().into());
        Self::new(subscription_id, EventType::PlanChange, metadata)
    }

    /// Records a cancellation request.
    pub fn cancellation(
        subscription_id: SubscriptionId,
        reason: impl Into<String>,
        at_period_end: bool,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("reason".into(), reason.into().into());
        metadata.insert("at_period_end".into(), at_period_end.into());
        Self::new(subscription_id, EventType::Cancellation, metadata)
    }

    /// Records a free-form event supplied by the host application.
    pub fn custom(subscription_id: SubscriptionId, metadata: Map<String, Value>) -> Self {
        Self::new(subscription_id, EventType::Custom, metadata)
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Raw metadata map. Prefer the typed views.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Typed view over a renewal event, or `None` for other types.
    pub fn as_renewal(&self) -> Option<RenewalEvent<'_>> {
        (self.event_type == EventType::Renewal).then_some(RenewalEvent(self))
    }

    /// Typed view over a status change event, or `None` for other types.
    pub fn as_status_change(&self) -> Option<StatusChangeEvent<'_>> {
        (self.event_type == EventType::StatusChange).then_some(StatusChangeEvent(self))
    }

    /// Typed view over a plan change event, or `None` for other types.
    pub fn as_plan_change(&self) -> Option<PlanChangeEvent<'_>> {
        (self.event_type == EventType::PlanChange).then_some(PlanChangeEvent(self))
    }

    /// Typed view over a cancellation event, or `None` for other types.
    pub fn as_cancellation(&self) -> Option<CancellationEvent<'_>> {
        (self.event_type == EventType::Cancellation).then_some(CancellationEvent(self))
    }

    fn i64_field(&self, key: &str) -> Option<i64> {
        self.metadata.get(key)?.as_i64()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }

    fn timestamp_field(&self, key: &str) -> Option<Timestamp> {
        serde_json::from_value(self.metadata.get(key)?.clone()).ok()
    }
}

fn timestamp_value(ts: Timestamp) -> Value {
    // Timestamp serializes to an RFC 3339 string; infallible for valid dates.
    serde_json::to_value(ts).unwrap_or(Value::Null)
}

fn parse_status(name: &str) -> Option<SubscriptionStatus> {
    serde_json::from_value(Value::String(name.to_owned())).ok()
}

/// View over `EventType::Renewal` metadata.
#[derive(Debug, Clone, Copy)]
pub struct RenewalEvent<'a>(&'a SubscriptionEvent);

impl RenewalEvent<'_> {
    pub fn price_cents(&self) -> Option<i64> {
        self.0.i64_field("price_cents")
    }

    pub fn renewed_from(&self) -> Option<Timestamp> {
        self.0.timestamp_field("renewed_from")
    }

    pub fn renewed_until(&self) -> Option<Timestamp> {
        self.0.timestamp_field("renewed_until")
    }
}

/// View over `EventType::StatusChange` metadata.
#[derive(Debug, Clone, Copy)]
pub struct StatusChangeEvent<'a>(&'a SubscriptionEvent);

impl StatusChangeEvent<'_> {
    pub fn from(&self) -> Option<SubscriptionStatus> {
        parse_status(self.0.str_field("from_status")?)
    }

    pub fn to(&self) -> Option<SubscriptionStatus> {
        parse_status(self.0.str_field("to_status")?)
    }
}

/// View over `EventType::PlanChange` metadata.
#[derive(Debug, Clone, Copy)]
pub struct PlanChangeEvent<'a>(&'a SubscriptionEvent);

impl PlanChangeEvent<'_> {
    pub fn from_plan_id(&self) -> Option<PlanId> {
        self.0.str_field("from_plan_id")?.parse().ok()
    }

    pub fn to_plan_id(&self) -> Option<PlanId> {
        self.0.str_field("to_plan_id")?.parse().ok()
    }
}

/// View over `EventType::Cancellation` metadata.
#[derive(Debug, Clone, Copy)]
pub struct CancellationEvent<'a>(&'a SubscriptionEvent);

impl CancellationEvent<'_> {
    pub fn reason(&self) -> Option<&str> {
        self.0.str_field("reason")
    }

    pub fn at_period_end(&self) -> Option<bool> {
        self.0.metadata.get("at_period_end")?.as_bool()
    }

    /// Cancellations carry no separate timestamp; the record's own
    /// creation time is when the cancellation was requested.
    pub fn canceled_at(&self) -> Timestamp {
        self.0.created_at()
    }
}
