//! Diesel schema for work-order persistence.

diesel::table! {
    /// Work-order records with lifecycle and reason fields.
    work_orders (id) {
        /// Work-order identifier.
        id -> Uuid,
        /// Work-order label.
        #[max_length = 255]
        name -> Varchar,
        /// Lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Assigned operator, if any.
        operator_id -> Nullable<Uuid>,
        /// Work start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Work finish timestamp.
        finished_at -> Nullable<Timestamptz>,
        /// Planned start date.
        planned_start -> Nullable<Timestamptz>,
        /// Planned end date.
        planned_end -> Nullable<Timestamptz>,
        /// Piece count.
        quantity -> Int8,
        /// Mandatory reason for scrapped orders.
        scrap_reason -> Nullable<Text>,
        /// Mandatory reason for blocked orders.
        fail_reason -> Nullable<Text>,
        /// Suspended reason-capture marker.
        #[max_length = 50]
        pending_reason -> Nullable<Varchar>,
        /// Attachment reference payload.
        attachments -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
