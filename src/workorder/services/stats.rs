//! Counter aggregation and the operator performance view.
//!
//! Deliberately decoupled from the lifecycle service: nothing updates
//! counters automatically on `done` or `scrap` — the orchestration layer
//! that owns the wiring decides when completed work becomes statistics.

use crate::workorder::{
    domain::{CounterDelta, Operator, OperatorId},
    ports::{OperatorDirectory, OperatorDirectoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// One line of the operator performance report.
///
/// The export collaborator renders these as delimited text; the core only
/// exposes the queryable view.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    /// Operator identifier.
    pub operator: OperatorId,
    /// Operator display name.
    pub name: String,
    /// Work orders completed.
    pub tasks_done: u64,
    /// Work orders written off as scrap.
    pub tasks_scrap: u64,
    /// Scrap share of finished work, in percent; 0 when nothing finished.
    pub defect_pct: f64,
    /// Cumulative hours, formatted to two decimals.
    pub hours: String,
}

impl PerformanceRow {
    fn from_operator(operator: &Operator) -> Self {
        let stats = operator.stats();
        Self {
            operator: operator.id(),
            name: operator.name().to_owned(),
            tasks_done: stats.tasks_done,
            tasks_scrap: stats.tasks_scrap,
            defect_pct: stats.defect_pct(),
            hours: stats.hours_formatted(),
        }
    }
}

/// Service-level errors for stats operations.
#[derive(Debug, Error)]
pub enum StatsServiceError {
    /// Directory operation failed.
    #[error(transparent)]
    Directory(#[from] OperatorDirectoryError),
}

/// Result type for stats service operations.
pub type StatsServiceResult<T> = Result<T, StatsServiceError>;

/// Operator statistics aggregation service.
#[derive(Clone)]
pub struct StatsService<D>
where
    D: OperatorDirectory,
{
    directory: Arc<D>,
}

impl<D> StatsService<D>
where
    D: OperatorDirectory,
{
    /// Creates a new stats service.
    #[must_use]
    pub const fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Folds a counter delta into an operator's running totals.
    ///
    /// A zero delta never reaches the store; an unknown operator id is a
    /// silent no-op. Safe to call repeatedly with partial deltas.
    ///
    /// # Errors
    ///
    /// Returns [`StatsServiceError::Directory`] when the store rejects the
    /// fold.
    pub async fn apply_counters(
        &self,
        operator: OperatorId,
        delta: CounterDelta,
    ) -> StatsServiceResult<()> {
        if delta.is_zero() {
            return Ok(());
        }
        Ok(self.directory.apply_counters(operator, delta).await?)
    }

    /// Builds the per-operator performance report, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`StatsServiceError::Directory`] when the operator listing
    /// fails.
    pub async fn performance_report(&self) -> StatsServiceResult<Vec<PerformanceRow>> {
        let operators = self.directory.list().await?;
        let mut rows: Vec<PerformanceRow> = operators
            .iter()
            .map(PerformanceRow::from_operator)
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}
