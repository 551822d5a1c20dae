//! In-memory work-order repository for tests and demo wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workorder::{
    domain::{OperatorId, WorkOrder, WorkOrderId, WorkOrderState},
    ports::{WorkOrderRepository, WorkOrderRepositoryError, WorkOrderRepositoryResult},
};

/// Thread-safe in-memory work-order repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkOrderRepository {
    state: Arc<RwLock<HashMap<WorkOrderId, WorkOrder>>>,
}

impl InMemoryWorkOrderRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> WorkOrderRepositoryError {
    WorkOrderRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WorkOrderRepository for InMemoryWorkOrderRepository {
    async fn store(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()> {
        order.check_write_invariants()?;
        let mut orders = self.state.write().map_err(lock_poisoned)?;
        if orders.contains_key(&order.id()) {
            return Err(WorkOrderRepositoryError::Duplicate(order.id()));
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn update(&self, order: &WorkOrder) -> WorkOrderRepositoryResult<()> {
        order.check_write_invariants()?;
        let mut orders = self.state.write().map_err(lock_poisoned)?;
        if !orders.contains_key(&order.id()) {
            return Err(WorkOrderRepositoryError::NotFound(order.id()));
        }
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: WorkOrderId) -> WorkOrderRepositoryResult<Option<WorkOrder>> {
        let orders = self.state.read().map_err(lock_poisoned)?;
        Ok(orders.get(&id).cloned())
    }

    async fn list_by_state(
        &self,
        state: WorkOrderState,
    ) -> WorkOrderRepositoryResult<Vec<WorkOrder>> {
        let orders = self.state.read().map_err(lock_poisoned)?;
        Ok(orders
            .values()
            .filter(|order| order.state() == state)
            .cloned()
            .collect())
    }

    async fn find_by_operator_in_state(
        &self,
        operator: OperatorId,
        state: WorkOrderState,
    ) -> WorkOrderRepositoryResult<Vec<WorkOrder>> {
        let orders = self.state.read().map_err(lock_poisoned)?;
        Ok(orders
            .values()
            .filter(|order| order.operator() == Some(operator) && order.state() == state)
            .cloned()
            .collect())
    }
}
