//! Directory port for operator records and counter aggregation.

use crate::workorder::domain::{CounterDelta, Operator, OperatorId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for operator directory operations.
pub type OperatorDirectoryResult<T> = Result<T, OperatorDirectoryError>;

/// Contract over the host user store for operator records and stats.
#[async_trait]
pub trait OperatorDirectory: Send + Sync {
    /// Registers an operator record.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorDirectoryError::Duplicate`] when the identifier
    /// already exists.
    async fn insert(&self, operator: &Operator) -> OperatorDirectoryResult<()>;

    /// Finds an operator by identifier.
    ///
    /// Returns `None` when the operator does not exist.
    async fn find_by_id(&self, id: OperatorId) -> OperatorDirectoryResult<Option<Operator>>;

    /// Returns all known operators.
    async fn list(&self) -> OperatorDirectoryResult<Vec<Operator>>;

    /// Folds a counter delta into the operator's running totals.
    ///
    /// A silent no-op when the operator is unknown; only non-zero delta
    /// components may touch their field. The fold must read current totals
    /// and write the sums, never overwrite with caller-supplied absolutes.
    async fn apply_counters(
        &self,
        id: OperatorId,
        delta: CounterDelta,
    ) -> OperatorDirectoryResult<()>;
}

/// Errors returned by operator directory implementations.
#[derive(Debug, Clone, Error)]
pub enum OperatorDirectoryError {
    /// An operator with the same identifier already exists.
    #[error("duplicate operator identifier: {0}")]
    Duplicate(OperatorId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OperatorDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
