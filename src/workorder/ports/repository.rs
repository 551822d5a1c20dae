//! Repository port for work-order persistence and filtered lookup.

use crate::workorder::domain::{OperatorId, WorkOrder, WorkOrderError, WorkOrderId, WorkOrderState};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for work-order repository operations.
pub type WorkOrderRepositoryResult<T> = Result<T, WorkOrderRepositoryError>;

/// Work-order persistence contract.
///
/// Every write path — `store` and `update` alike — must apply
/// [`WorkOrder::check_write_invariants`] before persisting, so that no row
/// can reach storage in an inconsistent state regardless of which caller
/// produced it.
#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    /// Stores a new work order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderRepositoryError::Duplicate`] when the identifier
    /// already exists, or [`WorkOrderRepositoryError::Invariant`] when the
    /// write-guard rejects the row.
    async fn store(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()>;

    /// Persists changes to an existing work order as one atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderRepositoryError::NotFound`] when the work order
    /// does not exist, or [`WorkOrderRepositoryError::Invariant`] when the
    /// write-guard rejects the row.
    async fn update(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()>;

    /// Finds a work order by identifier.
    ///
    /// Returns `None` when the work order does not exist.
    async fn find_by_id(&self, id: WorkOrderId) -> WorkOrderRepositoryResult<Option<WorkOrder>>;

    /// Returns all work orders currently in the given state.
    async fn list_by_state(&self, state: WorkOrderState)
    -> WorkOrderRepositoryResult<Vec<WorkOrder>>;

    /// Returns the work orders assigned to `operator` that are in `state`.
    ///
    /// Backs the one-active-order-per-operator scan; implementations must
    /// evaluate it against current data within the same isolation scope as
    /// the subsequent write.
    async fn find_by_operator_in_state(
        &self,
        operator: OperatorId,
        state: WorkOrderState,
    ) -> WorkOrderRepositoryResult<Vec<WorkOrder>>;
}

/// Errors returned by work-order repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkOrderRepositoryError {
    /// A work order with the same identifier already exists.
    #[error("duplicate work order identifier: {0}")]
    Duplicate(WorkOrderId),

    /// The work order was not found.
    #[error("work order not found: {0}")]
    NotFound(WorkOrderId),

    /// The write-guard rejected an inconsistent row.
    #[error("write rejected: {0}")]
    Invariant(#[from] WorkOrderError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkOrderRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
