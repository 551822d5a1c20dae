//! Diesel row models for work-order persistence.

use super::schema::work_orders;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for work-order records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = work_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkOrderRow {
    /// Work-order identifier.
    pub id: uuid::Uuid,
    /// Work-order label.
    pub name: String,
    /// Lifecycle state.
    pub state: String,
    /// Assigned operator, if any.
    pub operator_id: Option<uuid::Uuid>,
    /// Work start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Work finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Planned start date.
    pub planned_start: Option<DateTime<Utc>>,
    /// Planned end date.
    pub planned_end: Option<DateTime<Utc>>,
    /// Piece count.
    pub quantity: i64,
    /// Mandatory reason for scrapped orders.
    pub scrap_reason: Option<String>,
    /// Mandatory reason for blocked orders.
    pub fail_reason: Option<String>,
    /// Suspended reason-capture marker.
    pub pending_reason: Option<String>,
    /// Attachment reference payload.
    pub attachments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for work-order records.
///
/// `treat_none_as_null` matters for updates: a manager reset clears the
/// operator and both work timestamps, which must reach storage as NULLs
/// rather than being skipped.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = work_orders)]
#[diesel(treat_none_as_null = true)]
pub struct WorkOrderRecord {
    /// Work-order identifier.
    pub id: uuid::Uuid,
    /// Work-order label.
    pub name: String,
    /// Lifecycle state.
    pub state: String,
    /// Assigned operator, if any.
    pub operator_id: Option<uuid::Uuid>,
    /// Work start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Work finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Planned start date.
    pub planned_start: Option<DateTime<Utc>>,
    /// Planned end date.
    pub planned_end: Option<DateTime<Utc>>,
    /// Piece count.
    pub quantity: i64,
    /// Mandatory reason for scrapped orders.
    pub scrap_reason: Option<String>,
    /// Mandatory reason for blocked orders.
    pub fail_reason: Option<String>,
    /// Suspended reason-capture marker.
    pub pending_reason: Option<String>,
    /// Attachment reference payload.
    pub attachments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
