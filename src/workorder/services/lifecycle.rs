//! Service layer orchestrating work-order transitions.
//!
//! Each operation is one atomic read-validate-write against a single row:
//! load the current record, run the domain guards, persist the mutated row
//! as a unit, then append the audit event. Rejections leave the stored row
//! untouched.

use crate::workorder::{
    domain::{
        AttachmentRef, Capability, OperatorId, ReasonMode, ReasonPhase, TransitionEvent,
        WorkOrder, WorkOrderError, WorkOrderId, WorkOrderState,
    },
    ports::{
        Authorizer, AuthorizerError, TransitionLog, TransitionLogError, WorkOrderRepository,
        WorkOrderRepositoryError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkOrderRequest {
    name: String,
    operator: Option<OperatorId>,
    planned_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    quantity: Option<u32>,
    attachments: Vec<AttachmentRef>,
}

impl CreateWorkOrderRequest {
    /// Creates a request with the required label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: None,
            planned_window: None,
            quantity: None,
            attachments: Vec::new(),
        }
    }

    /// Pre-assigns the order to an operator.
    #[must_use]
    pub const fn with_operator(mut self, operator: OperatorId) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Sets the planned execution window.
    #[must_use]
    pub const fn with_planned_window(
        mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        self.planned_window = Some((start, end));
        self
    }

    /// Sets the piece count.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Attaches host-store file references.
    #[must_use]
    pub fn with_attachments(
        mut self,
        attachments: impl IntoIterator<Item = AttachmentRef>,
    ) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }
}

/// Result of a scrap or blocked request at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The terminal transition was committed; the updated row is returned.
    Completed(WorkOrder),
    /// The transition is suspended awaiting a mandatory reason.
    ///
    /// The caller collects free text and follows up with
    /// [`WorkOrderService::confirm_reason`] for the same mode.
    NeedsReason {
        /// Work order awaiting its reason.
        id: WorkOrderId,
        /// Which reason field must be filled.
        mode: ReasonMode,
    },
}

/// Service-level errors for work-order operations.
#[derive(Debug, Error)]
pub enum WorkOrderServiceError {
    /// Domain guard rejected the transition.
    #[error(transparent)]
    Domain(#[from] WorkOrderError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkOrderRepositoryError),

    /// Authorization lookup failed.
    #[error(transparent)]
    Authorization(#[from] AuthorizerError),

    /// Audit trail append failed.
    #[error(transparent)]
    Audit(#[from] TransitionLogError),

    /// The work order does not exist.
    #[error("work order not found: {0}")]
    NotFound(WorkOrderId),

    /// The actor lacks the required capability.
    #[error("'{0}' capability required")]
    PermissionDenied(Capability),
}

/// Result type for work-order service operations.
pub type WorkOrderServiceResult<T> = Result<T, WorkOrderServiceError>;

/// Work-order lifecycle orchestration service.
#[derive(Clone)]
pub struct WorkOrderService<R, A, L, C>
where
    R: WorkOrderRepository,
    A: Authorizer,
    L: TransitionLog,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    authorizer: Arc<A>,
    audit: Arc<L>,
    clock: Arc<C>,
}

impl<R, A, L, C> WorkOrderService<R, A, L, C>
where
    R: WorkOrderRepository,
    A: Authorizer,
    L: TransitionLog,
    C: Clock + Send + Sync,
{
    /// Creates a new work-order service.
    #[must_use]
    pub const fn new(repository: Arc<R>, authorizer: Arc<A>, audit: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            repository,
            authorizer,
            audit,
            clock,
        }
    }

    /// Creates and stores a new ready work order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderServiceError`] when the label is empty or the
    /// repository rejects the row.
    pub async fn create(&self, request: CreateWorkOrderRequest) -> WorkOrderServiceResult<WorkOrder> {
        let mut order = WorkOrder::new(request.name, &*self.clock)?;
        if let Some(operator) = request.operator {
            order = order.with_operator(operator);
        }
        if let Some((start, end)) = request.planned_window {
            order = order.with_planned_window(start, end);
        }
        if let Some(quantity) = request.quantity {
            order = order.with_quantity(quantity);
        }
        order = order.with_attachments(request.attachments);

        self.repository.store(&order).await?;
        Ok(order)
    }

    /// Retrieves a work order by identifier.
    ///
    /// Returns `Ok(None)` when the work order does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderServiceError::Repository`] when the lookup fails.
    pub async fn find(&self, id: WorkOrderId) -> WorkOrderServiceResult<Option<WorkOrder>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Returns all work orders currently in the given state.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderServiceError::Repository`] when the lookup fails.
    pub async fn list_by_state(
        &self,
        state: WorkOrderState,
    ) -> WorkOrderServiceResult<Vec<WorkOrder>> {
        Ok(self.repository.list_by_state(state).await?)
    }

    /// Assigns a ready order to `actor` and starts work.
    ///
    /// The ownership guard runs before the cross-record concurrency scan,
    /// so an order held by someone else reports
    /// [`WorkOrderError::AssignmentConflict`] even when the actor is also at
    /// their active-order limit.
    ///
    /// # Errors
    ///
    /// Returns the domain guard errors, or
    /// [`WorkOrderError::ConcurrencyLimit`] when the actor already has an
    /// order in progress.
    pub async fn take(
        &self,
        id: WorkOrderId,
        actor: OperatorId,
    ) -> WorkOrderServiceResult<WorkOrder> {
        let mut order = self.load(id).await?;
        order.check_take(actor)?;

        let active = self
            .repository
            .find_by_operator_in_state(actor, WorkOrderState::InProgress)
            .await?;
        if let Some(existing) = active.iter().find(|other| other.id() != id) {
            return Err(WorkOrderError::ConcurrencyLimit {
                operator: actor,
                active: existing.id(),
            }
            .into());
        }

        let from = order.state();
        order.begin(actor, &*self.clock)?;
        self.repository.update(&order).await?;
        self.record(&order, from, Some(actor)).await?;
        Ok(order)
    }

    /// Completes an in-progress order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is in
    /// progress.
    pub async fn complete(&self, id: WorkOrderId) -> WorkOrderServiceResult<WorkOrder> {
        let mut order = self.load(id).await?;
        let from = order.state();
        order.complete(&*self.clock)?;
        self.repository.update(&order).await?;
        let actor = order.operator();
        self.record(&order, from, actor).await?;
        Ok(order)
    }

    /// Writes an order off as scrap, suspending when no reason is available.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is
    /// ready or in progress.
    pub async fn scrap(
        &self,
        id: WorkOrderId,
        reason: Option<String>,
    ) -> WorkOrderServiceResult<TransitionOutcome> {
        let mut order = self.load(id).await?;
        let from = order.state();
        let phase = order.scrap(reason, &*self.clock)?;
        self.repository.update(&order).await?;
        self.finish_two_phase(order, from, phase).await
    }

    /// Reports an order as impossible to perform, suspending when no reason
    /// is available.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::AlreadyFinished`] when the order is done or
    /// scrapped.
    pub async fn report_blocked(
        &self,
        id: WorkOrderId,
        reason: Option<String>,
    ) -> WorkOrderServiceResult<TransitionOutcome> {
        let mut order = self.load(id).await?;
        let from = order.state();
        let phase = order.report_blocked(reason, &*self.clock)?;
        self.repository.update(&order).await?;
        self.finish_two_phase(order, from, phase).await
    }

    /// Completes a suspended reason-capture step for `mode`.
    ///
    /// A supplied reason is stored before validation, so callers can pass
    /// the collected text directly.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] when the order is not
    /// suspended for `mode`, or [`WorkOrderError::MissingReason`] when the
    /// mandatory reason is still blank.
    pub async fn confirm_reason(
        &self,
        id: WorkOrderId,
        mode: ReasonMode,
        reason: Option<String>,
    ) -> WorkOrderServiceResult<WorkOrder> {
        let mut order = self.load(id).await?;
        let from = order.state();
        order.confirm_reason(mode, reason, &*self.clock)?;
        self.repository.update(&order).await?;
        let actor = order.operator();
        self.record(&order, from, actor).await?;
        Ok(order)
    }

    /// Returns a terminal order to ready on behalf of a manager.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderServiceError::PermissionDenied`] when `actor`
    /// lacks the manager capability, or
    /// [`WorkOrderError::InvalidTransition`] unless the order is scrapped or
    /// blocked.
    pub async fn reset_to_ready(
        &self,
        id: WorkOrderId,
        actor: OperatorId,
    ) -> WorkOrderServiceResult<WorkOrder> {
        let permitted = self
            .authorizer
            .has_capability(actor, Capability::Manager)
            .await?;
        if !permitted {
            return Err(WorkOrderServiceError::PermissionDenied(Capability::Manager));
        }

        let mut order = self.load(id).await?;
        let from = order.state();
        order.reset(&*self.clock)?;
        self.repository.update(&order).await?;
        self.record(&order, from, Some(actor)).await?;
        Ok(order)
    }

    async fn load(&self, id: WorkOrderId) -> WorkOrderServiceResult<WorkOrder> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(WorkOrderServiceError::NotFound(id))
    }

    async fn finish_two_phase(
        &self,
        order: WorkOrder,
        from: WorkOrderState,
        phase: ReasonPhase,
    ) -> WorkOrderServiceResult<TransitionOutcome> {
        match phase {
            ReasonPhase::Applied => {
                let actor = order.operator();
                self.record(&order, from, actor).await?;
                Ok(TransitionOutcome::Completed(order))
            }
            // Suspension persists the pending marker but is not a
            // transition; no event until the reason is confirmed.
            ReasonPhase::AwaitingReason(mode) => Ok(TransitionOutcome::NeedsReason {
                id: order.id(),
                mode,
            }),
        }
    }

    async fn record(
        &self,
        order: &WorkOrder,
        from: WorkOrderState,
        actor: Option<OperatorId>,
    ) -> WorkOrderServiceResult<()> {
        let event = TransitionEvent::new(order.id(), from, order.state(), actor, order.updated_at());
        self.audit.append(event).await?;
        Ok(())
    }
}
