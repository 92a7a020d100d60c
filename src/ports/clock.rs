//! Clock port - injectable time source.
//!
//! Grace-period countdowns and due-date sweeps are time policy, so the
//! manager reads time through this port instead of the ambient wall clock.
//! Tests drive the workflow with a manual clock; production uses
//! `SystemClock`.

use crate::domain::foundation::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
