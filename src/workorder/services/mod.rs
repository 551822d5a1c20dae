//! Application services for work-order lifecycle and statistics.

mod lifecycle;
mod stats;

pub use lifecycle::{
    CreateWorkOrderRequest, TransitionOutcome, WorkOrderService, WorkOrderServiceError,
    WorkOrderServiceResult,
};
pub use stats::{PerformanceRow, StatsService, StatsServiceError, StatsServiceResult};
