//! Operator records, capabilities, and cumulative performance counters.

use super::OperatorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles the authorization collaborator can vouch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May take and execute work orders.
    Operator,
    /// May additionally reset terminal work orders back to ready.
    Manager,
}

impl Capability {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Manager => "manager",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative performance counters carried on an operator record.
///
/// Counters only ever move through [`OperatorStats::apply`]; a full
/// overwrite is never performed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorStats {
    /// Cumulative hours of completed work.
    pub hours_logged: f64,
    /// Number of work orders completed.
    pub tasks_done: u64,
    /// Number of work orders written off as scrap.
    pub tasks_scrap: u64,
}

impl OperatorStats {
    /// Folds a delta into the running totals.
    ///
    /// Only non-zero components touch their field, so repeated calls with
    /// partial or zero deltas never disturb unrelated counters.
    #[expect(
        clippy::float_arithmetic,
        reason = "hours accumulator is a float total by contract with the host user store"
    )]
    pub fn apply(&mut self, delta: CounterDelta) {
        if delta.hours != 0.0 {
            self.hours_logged += delta.hours;
        }
        if delta.done != 0 {
            self.tasks_done = self.tasks_done.saturating_add_signed(delta.done);
        }
        if delta.scrap != 0 {
            self.tasks_scrap = self.tasks_scrap.saturating_add_signed(delta.scrap);
        }
    }

    /// Scrap share of all finished work, as a percentage.
    ///
    /// Returns 0 when the operator has finished nothing yet.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "report percentage; counter magnitudes are far below f64 precision limits"
    )]
    pub fn defect_pct(&self) -> f64 {
        let total = self.tasks_done + self.tasks_scrap;
        if total == 0 {
            return 0.0;
        }
        self.tasks_scrap as f64 / total as f64 * 100.0
    }

    /// Cumulative hours rendered to two decimals for the export view.
    #[must_use]
    pub fn hours_formatted(&self) -> String {
        format!("{:.2}", self.hours_logged)
    }
}

/// Signed deltas folded into an operator's counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CounterDelta {
    /// Hours to add to the cumulative total.
    pub hours: f64,
    /// Change to the completed-order count.
    pub done: i64,
    /// Change to the scrapped-order count.
    pub scrap: i64,
}

impl CounterDelta {
    /// Creates a delta from its components.
    #[must_use]
    pub const fn new(hours: f64, done: i64, scrap: i64) -> Self {
        Self { hours, done, scrap }
    }

    /// Returns `true` when applying this delta would change nothing.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.hours == 0.0 && self.done == 0 && self.scrap == 0
    }
}

/// Operator record as the core sees it.
///
/// Identity and naming are owned by the host user store; this type carries
/// only the fields the tracker reads and the counters it folds into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    id: OperatorId,
    name: String,
    capabilities: Vec<Capability>,
    stats: OperatorStats,
}

impl Operator {
    /// Creates an operator record with zeroed counters.
    #[must_use]
    pub fn new(id: OperatorId, name: impl Into<String>, capabilities: Vec<Capability>) -> Self {
        Self {
            id,
            name: name.into(),
            capabilities,
            stats: OperatorStats::default(),
        }
    }

    /// Returns the operator identifier.
    #[must_use]
    pub const fn id(&self) -> OperatorId {
        self.id
    }

    /// Returns the operator display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when the operator holds the capability.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns the cumulative performance counters.
    #[must_use]
    pub const fn stats(&self) -> &OperatorStats {
        &self.stats
    }

    /// Folds a delta into this record's counters.
    pub fn apply_counters(&mut self, delta: CounterDelta) {
        self.stats.apply(delta);
    }
}
