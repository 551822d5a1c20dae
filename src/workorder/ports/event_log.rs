//! Append-only transition log port for the audit trail.

use crate::workorder::domain::{TransitionEvent, WorkOrderId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transition log operations.
pub type TransitionLogResult<T> = Result<T, TransitionLogError>;

/// Audit sink receiving one event per successful transition.
///
/// Events are append-only; implementations never rewrite or delete them.
#[async_trait]
pub trait TransitionLog: Send + Sync {
    /// Appends a transition event.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionLogError::Append`] when the sink rejects the
    /// event.
    async fn append(&self, event: TransitionEvent) -> TransitionLogResult<()>;

    /// Returns the events recorded for a work order, oldest first.
    async fn events_for(&self, id: WorkOrderId) -> TransitionLogResult<Vec<TransitionEvent>>;
}

/// Errors returned by transition log implementations.
#[derive(Debug, Clone, Error)]
pub enum TransitionLogError {
    /// The sink could not record the event.
    #[error("transition log append failed: {0}")]
    Append(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransitionLogError {
    /// Wraps an append error.
    pub fn append(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Append(Arc::new(err))
    }
}
