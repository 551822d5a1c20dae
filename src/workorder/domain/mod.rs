//! Domain model for the operator work-order tracker.
//!
//! The domain owns the lifecycle state machine, its guard conditions, the
//! mandatory-reason invariants, and the per-operator counters while keeping
//! all infrastructure concerns outside of the domain boundary.

mod error;
mod event;
mod ids;
mod operator;
mod order;

pub use error::{ParseWorkOrderStateError, WorkOrderError};
pub use event::TransitionEvent;
pub use ids::{AttachmentRef, OperatorId, WorkOrderId};
pub use operator::{Capability, CounterDelta, Operator, OperatorStats};
pub use order::{PersistedWorkOrder, ReasonMode, ReasonPhase, WorkOrder, WorkOrderState};
