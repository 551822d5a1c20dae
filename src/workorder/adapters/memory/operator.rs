//! In-memory operator directory doubling as the authorizer.
//!
//! The host deployment answers capability checks from the same user store
//! that carries the stat counters, so the memory adapter mirrors that by
//! implementing both ports over one record set.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workorder::{
    domain::{Capability, CounterDelta, Operator, OperatorId},
    ports::{
        Authorizer, AuthorizerError, AuthorizerResult, OperatorDirectory, OperatorDirectoryError,
        OperatorDirectoryResult,
    },
};

/// Thread-safe in-memory operator directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOperatorDirectory {
    state: Arc<RwLock<HashMap<OperatorId, Operator>>>,
}

impl InMemoryOperatorDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> OperatorDirectoryError {
    OperatorDirectoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl OperatorDirectory for InMemoryOperatorDirectory {
    async fn insert(&self, operator: &Operator) -> OperatorDirectoryResult<()> {
        let mut operators = self.state.write().map_err(lock_poisoned)?;
        if operators.contains_key(&operator.id()) {
            return Err(OperatorDirectoryError::Duplicate(operator.id()));
        }
        operators.insert(operator.id(), operator.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OperatorId) -> OperatorDirectoryResult<Option<Operator>> {
        let operators = self.state.read().map_err(lock_poisoned)?;
        Ok(operators.get(&id).cloned())
    }

    async fn list(&self) -> OperatorDirectoryResult<Vec<Operator>> {
        let operators = self.state.read().map_err(lock_poisoned)?;
        Ok(operators.values().cloned().collect())
    }

    async fn apply_counters(
        &self,
        id: OperatorId,
        delta: CounterDelta,
    ) -> OperatorDirectoryResult<()> {
        let mut operators = self.state.write().map_err(lock_poisoned)?;
        if let Some(operator) = operators.get_mut(&id) {
            operator.apply_counters(delta);
        }
        Ok(())
    }
}

#[async_trait]
impl Authorizer for InMemoryOperatorDirectory {
    async fn has_capability(
        &self,
        actor: OperatorId,
        capability: Capability,
    ) -> AuthorizerResult<bool> {
        let operators = self
            .state
            .read()
            .map_err(|err| AuthorizerError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(operators
            .get(&actor)
            .is_some_and(|operator| operator.has_capability(capability)))
    }
}
