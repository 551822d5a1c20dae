//! Error types for work-order domain validation and transitions.

use super::{OperatorId, ReasonMode, WorkOrderId, WorkOrderState};
use thiserror::Error;

/// Errors returned by work-order construction and state transitions.
///
/// Every variant carries a user-facing message; the service layer surfaces
/// them to the actor unchanged and never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkOrderError {
    /// The requested transition is not legal from the current state.
    #[error("work order {id} cannot move from '{from}' to '{to}'")]
    InvalidTransition {
        /// Work order being transitioned.
        id: WorkOrderId,
        /// Current lifecycle state.
        from: WorkOrderState,
        /// Requested target state.
        to: WorkOrderState,
    },

    /// The work order is already assigned to a different operator.
    #[error("work order {id} is already assigned to another operator")]
    AssignmentConflict {
        /// Work order being taken.
        id: WorkOrderId,
        /// Operator currently holding the assignment.
        operator: OperatorId,
    },

    /// The operator already has a work order in progress.
    #[error("operator {operator} already has work order {active} in progress")]
    ConcurrencyLimit {
        /// Operator attempting the take.
        operator: OperatorId,
        /// The operator's currently active work order.
        active: WorkOrderId,
    },

    /// The work order is in a terminal state and cannot be reported blocked.
    #[error("work order {id} is already finished ('{state}')")]
    AlreadyFinished {
        /// Work order being reported.
        id: WorkOrderId,
        /// Terminal state the order is in.
        state: WorkOrderState,
    },

    /// A terminal transition was confirmed without its mandatory reason.
    #[error("a non-empty {0} reason is required")]
    MissingReason(ReasonMode),

    /// The work-order name is empty after trimming.
    #[error("work order name must not be empty")]
    EmptyName,

    /// The finish timestamp precedes the start timestamp.
    #[error("work order {0} finish time precedes its start time")]
    InconsistentTimestamps(WorkOrderId),
}

/// Error returned while parsing work-order states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown work order state: {0}")]
pub struct ParseWorkOrderStateError(pub String);
