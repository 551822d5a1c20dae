//! In-memory append-only transition log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::workorder::{
    domain::{TransitionEvent, WorkOrderId},
    ports::{TransitionLog, TransitionLogError, TransitionLogResult},
};

/// Thread-safe in-memory transition log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransitionLog {
    events: Arc<RwLock<Vec<TransitionEvent>>>,
}

impl InMemoryTransitionLog {
    /// Creates an empty in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded event in append order.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionLogError::Append`] when the log lock is poisoned.
    pub fn all_events(&self) -> TransitionLogResult<Vec<TransitionEvent>> {
        let events = self.events.read().map_err(lock_poisoned)?;
        Ok(events.clone())
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> TransitionLogError {
    TransitionLogError::append(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TransitionLog for InMemoryTransitionLog {
    async fn append(&self, event: TransitionEvent) -> TransitionLogResult<()> {
        let mut events = self.events.write().map_err(lock_poisoned)?;
        events.push(event);
        Ok(())
    }

    async fn events_for(&self, id: WorkOrderId) -> TransitionLogResult<Vec<TransitionEvent>> {
        let events = self.events.read().map_err(lock_poisoned)?;
        Ok(events
            .iter()
            .filter(|event| event.work_order == id)
            .cloned()
            .collect())
    }
}
