//! Work-order aggregate root and lifecycle state machine.

use super::{AttachmentRef, OperatorId, ParseWorkOrderStateError, WorkOrderError, WorkOrderId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work-order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderState {
    /// Order is available for an operator to take.
    Ready,
    /// Order is being worked by its assigned operator.
    InProgress,
    /// Order was completed successfully.
    Done,
    /// Order produced scrap and was written off.
    Scrap,
    /// Order could not be performed.
    Blocked,
}

impl WorkOrderState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Scrap => "scrap",
            Self::Blocked => "blocked",
        }
    }

    /// Returns `true` when no operator-driven transition leaves this state.
    ///
    /// Scrap and blocked orders can still be returned to ready by a manager
    /// reset; done orders cannot leave at all.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Scrap | Self::Blocked)
    }

    /// Fixed column order used by the kanban presentation layer.
    ///
    /// This ordering is a contract: list and board views group work orders
    /// by state in exactly this sequence.
    #[must_use]
    pub const fn column_order() -> [Self; 5] {
        [
            Self::Ready,
            Self::InProgress,
            Self::Scrap,
            Self::Blocked,
            Self::Done,
        ]
    }
}

impl fmt::Display for WorkOrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkOrderState {
    type Error = ParseWorkOrderStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "ready" => Ok(Self::Ready),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "scrap" => Ok(Self::Scrap),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseWorkOrderStateError(value.to_owned())),
        }
    }
}

/// Which mandatory-reason field a suspended transition is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonMode {
    /// Awaiting a scrap reason before committing the scrap state.
    Scrap,
    /// Awaiting a failure reason before committing the blocked state.
    Blocked,
}

impl ReasonMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scrap => "scrap",
            Self::Blocked => "blocked",
        }
    }

    /// Terminal state this capture step commits once the reason is present.
    #[must_use]
    pub const fn target_state(self) -> WorkOrderState {
        match self {
            Self::Scrap => WorkOrderState::Scrap,
            Self::Blocked => WorkOrderState::Blocked,
        }
    }
}

impl fmt::Display for ReasonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReasonMode {
    type Error = ParseWorkOrderStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "scrap" => Ok(Self::Scrap),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseWorkOrderStateError(value.to_owned())),
        }
    }
}

/// Outcome of a scrap or blocked request on the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonPhase {
    /// The terminal transition was applied immediately.
    Applied,
    /// The transition is suspended until a reason is confirmed.
    AwaitingReason(ReasonMode),
}

/// Work-order aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    id: WorkOrderId,
    name: String,
    state: WorkOrderState,
    operator: Option<OperatorId>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    planned_start: Option<DateTime<Utc>>,
    planned_end: Option<DateTime<Utc>>,
    quantity: u32,
    scrap_reason: Option<String>,
    fail_reason: Option<String>,
    pending_reason: Option<ReasonMode>,
    attachments: Vec<AttachmentRef>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkOrder {
    /// Persisted work-order identifier.
    pub id: WorkOrderId,
    /// Persisted label.
    pub name: String,
    /// Persisted lifecycle state.
    pub state: WorkOrderState,
    /// Persisted operator assignment, if any.
    pub operator: Option<OperatorId>,
    /// Persisted work start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted work finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Persisted planned start date.
    pub planned_start: Option<DateTime<Utc>>,
    /// Persisted planned end date.
    pub planned_end: Option<DateTime<Utc>>,
    /// Persisted piece count.
    pub quantity: u32,
    /// Persisted scrap reason, if any.
    pub scrap_reason: Option<String>,
    /// Persisted failure reason, if any.
    pub fail_reason: Option<String>,
    /// Persisted suspended reason-capture marker.
    pub pending_reason: Option<ReasonMode>,
    /// Persisted attachment references.
    pub attachments: Vec<AttachmentRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl WorkOrder {
    /// Creates a new ready work order with the given label.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::EmptyName`] when the label is empty after
    /// trimming.
    pub fn new(name: impl Into<String>, clock: &impl Clock) -> Result<Self, WorkOrderError> {
        let label = name.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(WorkOrderError::EmptyName);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkOrderId::new(),
            name: trimmed.to_owned(),
            state: WorkOrderState::Ready,
            operator: None,
            started_at: None,
            finished_at: None,
            planned_start: None,
            planned_end: None,
            quantity: 1,
            scrap_reason: None,
            fail_reason: None,
            pending_reason: None,
            attachments: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Pre-assigns the order to an operator without starting work.
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
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    /// Sets the piece count.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Attaches host-store file references.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = AttachmentRef>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }

    /// Reconstructs a work order from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkOrder) -> Self {
        Self {
            id: data.id,
            name: data.name,
            state: data.state,
            operator: data.operator,
            started_at: data.started_at,
            finished_at: data.finished_at,
            planned_start: data.planned_start,
            planned_end: data.planned_end,
            quantity: data.quantity,
            scrap_reason: data.scrap_reason,
            fail_reason: data.fail_reason,
            pending_reason: data.pending_reason,
            attachments: data.attachments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the work-order identifier.
    #[must_use]
    pub const fn id(&self) -> WorkOrderId {
        self.id
    }

    /// Returns the work-order label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WorkOrderState {
        self.state
    }

    /// Returns the assigned operator, if any.
    #[must_use]
    pub const fn operator(&self) -> Option<OperatorId> {
        self.operator
    }

    /// Returns the work start timestamp, if set.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the work finish timestamp, if set.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns the planned start date, if set.
    #[must_use]
    pub const fn planned_start(&self) -> Option<DateTime<Utc>> {
        self.planned_start
    }

    /// Returns the planned end date, if set.
    #[must_use]
    pub const fn planned_end(&self) -> Option<DateTime<Utc>> {
        self.planned_end
    }

    /// Returns the piece count.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the scrap reason, if any.
    #[must_use]
    pub fn scrap_reason(&self) -> Option<&str> {
        self.scrap_reason.as_deref()
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub fn fail_reason(&self) -> Option<&str> {
        self.fail_reason.as_deref()
    }

    /// Returns the suspended reason-capture marker, if any.
    #[must_use]
    pub const fn pending_reason(&self) -> Option<ReasonMode> {
        self.pending_reason
    }

    /// Returns the attachment references.
    #[must_use]
    pub fn attachments(&self) -> &[AttachmentRef] {
        &self.attachments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Elapsed whole minutes between start and finish, or 0 when either
    /// timestamp is unset.
    ///
    /// Derived on every read from the current timestamps; never stored.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(finish)) => (finish - start).num_minutes().max(0),
            _ => 0,
        }
    }

    /// Validates that `actor` may take this order, without mutating it.
    ///
    /// The ownership check runs before any cross-record concurrency scan so
    /// that [`WorkOrderError::AssignmentConflict`] takes precedence when both
    /// would fail.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is
    /// ready, or [`WorkOrderError::AssignmentConflict`] when it is already
    /// assigned to a different operator.
    pub fn check_take(&self, actor: OperatorId) -> Result<(), WorkOrderError> {
        if self.state != WorkOrderState::Ready {
            return Err(self.invalid_transition(WorkOrderState::InProgress));
        }
        match self.operator {
            Some(assigned) if assigned != actor => Err(WorkOrderError::AssignmentConflict {
                id: self.id,
                operator: assigned,
            }),
            _ => Ok(()),
        }
    }

    /// Moves the order into progress under `actor`.
    ///
    /// # Errors
    ///
    /// Propagates the [`Self::check_take`] validation errors.
    pub fn begin(&mut self, actor: OperatorId, clock: &impl Clock) -> Result<(), WorkOrderError> {
        self.check_take(actor)?;
        self.state = WorkOrderState::InProgress;
        self.operator = Some(actor);
        self.started_at = Some(clock.utc());
        self.pending_reason = None;
        self.touch(clock);
        Ok(())
    }

    /// Completes an in-progress order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is in
    /// progress.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), WorkOrderError> {
        if self.state != WorkOrderState::InProgress {
            return Err(self.invalid_transition(WorkOrderState::Done));
        }
        self.state = WorkOrderState::Done;
        self.finished_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Writes the order off as scrap, or suspends awaiting a reason.
    ///
    /// A supplied non-blank reason replaces any stored one. When neither a
    /// supplied nor a stored reason is available the transition suspends:
    /// the pending marker is set and the caller must follow up with
    /// [`Self::confirm_reason`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is
    /// ready or in progress.
    pub fn scrap(
        &mut self,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<ReasonPhase, WorkOrderError> {
        if !matches!(self.state, WorkOrderState::Ready | WorkOrderState::InProgress) {
            return Err(self.invalid_transition(WorkOrderState::Scrap));
        }
        if let Some(text) = non_blank(reason) {
            self.scrap_reason = Some(text);
        }
        if !has_text(self.scrap_reason.as_deref()) {
            self.pending_reason = Some(ReasonMode::Scrap);
            self.touch(clock);
            return Ok(ReasonPhase::AwaitingReason(ReasonMode::Scrap));
        }
        self.commit_scrap(clock);
        Ok(ReasonPhase::Applied)
    }

    /// Reports the order as impossible to perform, or suspends awaiting a
    /// reason.
    ///
    /// Re-reporting an already blocked order with a new reason is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::AlreadyFinished`] when the order is done or
    /// scrapped.
    pub fn report_blocked(
        &mut self,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<ReasonPhase, WorkOrderError> {
        if matches!(self.state, WorkOrderState::Done | WorkOrderState::Scrap) {
            return Err(WorkOrderError::AlreadyFinished {
                id: self.id,
                state: self.state,
            });
        }
        if let Some(text) = non_blank(reason) {
            self.fail_reason = Some(text);
        }
        if !has_text(self.fail_reason.as_deref()) {
            self.pending_reason = Some(ReasonMode::Blocked);
            self.touch(clock);
            return Ok(ReasonPhase::AwaitingReason(ReasonMode::Blocked));
        }
        self.commit_blocked(clock);
        Ok(ReasonPhase::Applied)
    }

    /// Completes a suspended reason-capture step.
    ///
    /// A supplied non-blank reason is stored into the field `mode` guards
    /// before validation, so the caller can pass collected input directly.
    /// On [`WorkOrderError::MissingReason`] the pending marker is retained
    /// and the caller may confirm again.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] when the order is not
    /// suspended for `mode`, or [`WorkOrderError::MissingReason`] when the
    /// mandatory reason is still blank.
    pub fn confirm_reason(
        &mut self,
        mode: ReasonMode,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), WorkOrderError> {
        if self.pending_reason != Some(mode) {
            return Err(self.invalid_transition(mode.target_state()));
        }
        if let Some(text) = non_blank(reason) {
            match mode {
                ReasonMode::Scrap => self.scrap_reason = Some(text),
                ReasonMode::Blocked => self.fail_reason = Some(text),
            }
        }
        let stored = match mode {
            ReasonMode::Scrap => self.scrap_reason.as_deref(),
            ReasonMode::Blocked => self.fail_reason.as_deref(),
        };
        if !has_text(stored) {
            return Err(WorkOrderError::MissingReason(mode));
        }
        match mode {
            ReasonMode::Scrap => self.commit_scrap(clock),
            ReasonMode::Blocked => self.commit_blocked(clock),
        }
        Ok(())
    }

    /// Returns a terminal order to ready.
    ///
    /// Clears the operator assignment and both work timestamps; reasons are
    /// retained for audit. Capability enforcement belongs to the service
    /// layer.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::InvalidTransition`] unless the order is
    /// scrapped or blocked.
    pub fn reset(&mut self, clock: &impl Clock) -> Result<(), WorkOrderError> {
        if !matches!(self.state, WorkOrderState::Scrap | WorkOrderState::Blocked) {
            return Err(self.invalid_transition(WorkOrderState::Ready));
        }
        self.state = WorkOrderState::Ready;
        self.operator = None;
        self.started_at = None;
        self.finished_at = None;
        self.pending_reason = None;
        self.touch(clock);
        Ok(())
    }

    /// Global write-guard checked by every repository adapter before a row
    /// is persisted, independent of which transition produced the write.
    ///
    /// # Errors
    ///
    /// Returns [`WorkOrderError::MissingReason`] when a scrap or blocked row
    /// lacks its mandatory reason, or
    /// [`WorkOrderError::InconsistentTimestamps`] when the finish precedes
    /// the start.
    pub fn check_write_invariants(&self) -> Result<(), WorkOrderError> {
        match self.state {
            WorkOrderState::Scrap if !has_text(self.scrap_reason.as_deref()) => {
                return Err(WorkOrderError::MissingReason(ReasonMode::Scrap));
            }
            WorkOrderState::Blocked if !has_text(self.fail_reason.as_deref()) => {
                return Err(WorkOrderError::MissingReason(ReasonMode::Blocked));
            }
            _ => {}
        }
        if let (Some(start), Some(finish)) = (self.started_at, self.finished_at)
            && finish < start
        {
            return Err(WorkOrderError::InconsistentTimestamps(self.id));
        }
        Ok(())
    }

    fn commit_scrap(&mut self, clock: &impl Clock) {
        self.state = WorkOrderState::Scrap;
        if self.finished_at.is_none() {
            self.finished_at = Some(clock.utc());
        }
        self.pending_reason = None;
        self.touch(clock);
    }

    fn commit_blocked(&mut self, clock: &impl Clock) {
        self.state = WorkOrderState::Blocked;
        self.pending_reason = None;
        self.touch(clock);
    }

    const fn invalid_transition(&self, to: WorkOrderState) -> WorkOrderError {
        WorkOrderError::InvalidTransition {
            id: self.id,
            from: self.state,
            to,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Returns `true` when the optional text contains non-whitespace content.
fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

/// Normalizes optional input to a trimmed, non-empty string.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
