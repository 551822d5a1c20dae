//! Domain-focused tests for work-order construction and derived fields.

use crate::workorder::domain::{
    AttachmentRef, OperatorId, ParseWorkOrderStateError, PersistedWorkOrder, WorkOrder,
    WorkOrderError, WorkOrderId, WorkOrderState,
};
use chrono::{Duration, TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

/// Builds a persisted row with controlled timestamps for derived-field
/// checks.
fn persisted_with_times(
    state: WorkOrderState,
    started_offset_secs: Option<i64>,
    finished_offset_secs: Option<i64>,
) -> PersistedWorkOrder {
    let base = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).single().expect("valid base time");
    PersistedWorkOrder {
        id: WorkOrderId::new(),
        name: "Mill housing".to_owned(),
        state,
        operator: None,
        started_at: started_offset_secs.map(|secs| base + Duration::seconds(secs)),
        finished_at: finished_offset_secs.map(|secs| base + Duration::seconds(secs)),
        planned_start: None,
        planned_end: None,
        quantity: 1,
        scrap_reason: None,
        fail_reason: None,
        pending_reason: None,
        attachments: Vec::new(),
        created_at: base,
        updated_at: base,
    }
}

#[rstest]
fn new_order_starts_ready_with_nothing_set(clock: DefaultClock) {
    let order = WorkOrder::new("Drill bracket", &clock).expect("valid name");

    assert_eq!(order.state(), WorkOrderState::Ready);
    assert_eq!(order.operator(), None);
    assert!(order.started_at().is_none());
    assert!(order.finished_at().is_none());
    assert_eq!(order.pending_reason(), None);
    assert_eq!(order.quantity(), 1);
    assert_eq!(order.duration_minutes(), 0);
    assert_eq!(order.created_at(), order.updated_at());
}

#[rstest]
#[case("")]
#[case("   ")]
fn new_order_rejects_blank_name(#[case] name: &str, clock: DefaultClock) {
    assert_eq!(
        WorkOrder::new(name, &clock).map(|order| order.id()),
        Err(WorkOrderError::EmptyName)
    );
}

#[rstest]
fn name_is_trimmed(clock: DefaultClock) {
    let order = WorkOrder::new("  Deburr casing  ", &clock).expect("valid name");
    assert_eq!(order.name(), "Deburr casing");
}

#[rstest]
fn builders_populate_optional_fields(clock: DefaultClock) {
    let operator = OperatorId::new();
    let start = Utc.with_ymd_and_hms(2025, 3, 11, 6, 0, 0).single().expect("valid time");
    let end = start + Duration::hours(8);

    let order = WorkOrder::new("Assemble gearbox", &clock)
        .expect("valid name")
        .with_operator(operator)
        .with_planned_window(start, end)
        .with_quantity(12)
        .with_attachments(vec![AttachmentRef::new("drawing-42.pdf")]);

    assert_eq!(order.operator(), Some(operator));
    assert_eq!(order.planned_start(), Some(start));
    assert_eq!(order.planned_end(), Some(end));
    assert_eq!(order.quantity(), 12);
    assert_eq!(order.attachments(), &[AttachmentRef::new("drawing-42.pdf")]);
    // Pre-assignment never starts work.
    assert_eq!(order.state(), WorkOrderState::Ready);
    assert!(order.started_at().is_none());
}

#[rstest]
#[case(None, None, 0)]
#[case(Some(0), None, 0)]
#[case(Some(0), Some(0), 0)]
#[case(Some(0), Some(59), 0)]
#[case(Some(0), Some(60), 1)]
#[case(Some(0), Some(150), 2)]
#[case(Some(0), Some(7200), 120)]
fn duration_is_floored_whole_minutes(
    #[case] started: Option<i64>,
    #[case] finished: Option<i64>,
    #[case] expected: i64,
) {
    let order = WorkOrder::from_persisted(persisted_with_times(
        WorkOrderState::Done,
        started,
        finished,
    ));
    assert_eq!(order.duration_minutes(), expected);
}

#[rstest]
fn column_order_matches_board_contract() {
    assert_eq!(
        WorkOrderState::column_order(),
        [
            WorkOrderState::Ready,
            WorkOrderState::InProgress,
            WorkOrderState::Scrap,
            WorkOrderState::Blocked,
            WorkOrderState::Done,
        ]
    );
}

#[rstest]
#[case(WorkOrderState::Ready, "ready")]
#[case(WorkOrderState::InProgress, "in_progress")]
#[case(WorkOrderState::Blocked, "blocked")]
fn state_storage_representation_round_trips(#[case] state: WorkOrderState, #[case] text: &str) {
    assert_eq!(state.as_str(), text);
    assert_eq!(WorkOrderState::try_from(text), Ok(state));
}

#[rstest]
fn unknown_state_text_is_rejected() {
    assert_eq!(
        WorkOrderState::try_from("paused"),
        Err(ParseWorkOrderStateError("paused".to_owned()))
    );
}

#[rstest]
#[case(WorkOrderState::Ready, false)]
#[case(WorkOrderState::InProgress, false)]
#[case(WorkOrderState::Done, true)]
#[case(WorkOrderState::Scrap, true)]
#[case(WorkOrderState::Blocked, true)]
fn is_terminal_returns_expected(#[case] state: WorkOrderState, #[case] expected: bool) {
    assert_eq!(state.is_terminal(), expected);
}
