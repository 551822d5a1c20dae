//! Append-only transition events for the work-order audit trail.

use super::{OperatorId, WorkOrderId, WorkOrderState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one successful state transition.
///
/// Emitted by the service layer after the new row has been persisted, never
/// for rejected transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Work order the transition applied to.
    pub work_order: WorkOrderId,
    /// State before the transition.
    pub from: WorkOrderState,
    /// State after the transition.
    pub to: WorkOrderState,
    /// Acting operator, when one is known for the transition.
    pub actor: Option<OperatorId>,
    /// Wall-clock time the transition was committed.
    pub occurred_at: DateTime<Utc>,
}

impl TransitionEvent {
    /// Creates a transition event record.
    #[must_use]
    pub const fn new(
        work_order: WorkOrderId,
        from: WorkOrderState,
        to: WorkOrderState,
        actor: Option<OperatorId>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            work_order,
            from,
            to,
            actor,
            occurred_at,
        }
    }
}
