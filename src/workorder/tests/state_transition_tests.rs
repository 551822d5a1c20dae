//! Unit tests for state-machine guards and the reason-capture protocol.

use crate::workorder::domain::{
    OperatorId, ReasonMode, ReasonPhase, WorkOrder, WorkOrderError, WorkOrderState,
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

/// Walks a fresh order into the requested state through real transitions.
fn order_in_state(state: WorkOrderState, clock: &DefaultClock) -> eyre::Result<WorkOrder> {
    let mut order = WorkOrder::new("Turn shaft", clock)?;
    let operator = OperatorId::new();
    match state {
        WorkOrderState::Ready => {}
        WorkOrderState::InProgress => order.begin(operator, clock)?,
        WorkOrderState::Done => {
            order.begin(operator, clock)?;
            order.complete(clock)?;
        }
        WorkOrderState::Scrap => {
            let phase = order.scrap(Some("surface defect".to_owned()), clock)?;
            ensure!(phase == ReasonPhase::Applied);
        }
        WorkOrderState::Blocked => {
            let phase = order.report_blocked(Some("tooling missing".to_owned()), clock)?;
            ensure!(phase == ReasonPhase::Applied);
        }
    }
    ensure!(order.state() == state);
    Ok(order)
}

#[rstest]
fn begin_assigns_operator_and_starts_clock(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Ready, &clock)?;
    let operator = OperatorId::new();

    order.begin(operator, &clock)?;

    ensure!(order.state() == WorkOrderState::InProgress);
    ensure!(order.operator() == Some(operator));
    ensure!(order.started_at().is_some());
    ensure!(order.finished_at().is_none());
    Ok(())
}

#[rstest]
#[case(WorkOrderState::InProgress)]
#[case(WorkOrderState::Done)]
#[case(WorkOrderState::Scrap)]
#[case(WorkOrderState::Blocked)]
fn begin_rejected_outside_ready(
    #[case] from: WorkOrderState,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;
    let result = order.begin(OperatorId::new(), &clock);
    let expected = Err(WorkOrderError::InvalidTransition {
        id: order.id(),
        from,
        to: WorkOrderState::InProgress,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(order.state() == from);
    Ok(())
}

#[rstest]
fn preassigned_order_can_be_taken_by_its_operator(clock: DefaultClock) -> eyre::Result<()> {
    let operator = OperatorId::new();
    let mut order = WorkOrder::new("Polish flange", &clock)?.with_operator(operator);

    order.begin(operator, &clock)?;

    ensure!(order.state() == WorkOrderState::InProgress);
    Ok(())
}

#[rstest]
fn preassigned_order_rejects_another_operator(clock: DefaultClock) -> eyre::Result<()> {
    let owner = OperatorId::new();
    let mut order = WorkOrder::new("Polish flange", &clock)?.with_operator(owner);

    let result = order.begin(OperatorId::new(), &clock);
    let expected = Err(WorkOrderError::AssignmentConflict {
        id: order.id(),
        operator: owner,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(order.state() == WorkOrderState::Ready);
    ensure!(order.operator() == Some(owner));
    Ok(())
}

#[rstest]
#[case(WorkOrderState::Ready, false)]
#[case(WorkOrderState::InProgress, true)]
#[case(WorkOrderState::Done, false)]
#[case(WorkOrderState::Scrap, false)]
#[case(WorkOrderState::Blocked, false)]
fn complete_only_from_in_progress(
    #[case] from: WorkOrderState,
    #[case] permitted: bool,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;
    let result = order.complete(&clock);

    if permitted {
        result?;
        ensure!(order.state() == WorkOrderState::Done);
        ensure!(order.finished_at().is_some());
    } else {
        let expected = Err(WorkOrderError::InvalidTransition {
            id: order.id(),
            from,
            to: WorkOrderState::Done,
        });
        if result != expected {
            bail!("expected {expected:?}, got {result:?}");
        }
        ensure!(order.state() == from);
    }
    Ok(())
}

#[rstest]
#[case(WorkOrderState::Ready)]
#[case(WorkOrderState::InProgress)]
fn scrap_with_reason_commits(#[case] from: WorkOrderState, clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;

    let phase = order.scrap(Some("cracked blank".to_owned()), &clock)?;

    ensure!(phase == ReasonPhase::Applied);
    ensure!(order.state() == WorkOrderState::Scrap);
    ensure!(order.scrap_reason() == Some("cracked blank"));
    ensure!(order.finished_at().is_some());
    ensure!(order.pending_reason().is_none());
    Ok(())
}

#[rstest]
#[case(WorkOrderState::Done)]
#[case(WorkOrderState::Blocked)]
fn scrap_rejected_from_ineligible_states(
    #[case] from: WorkOrderState,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;
    let result = order.scrap(Some("late defect".to_owned()), &clock);
    let expected = Err(WorkOrderError::InvalidTransition {
        id: order.id(),
        from,
        to: WorkOrderState::Scrap,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(order.state() == from);
    Ok(())
}

#[rstest]
fn scrap_without_reason_suspends(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::InProgress, &clock)?;

    let phase = order.scrap(None, &clock)?;

    ensure!(phase == ReasonPhase::AwaitingReason(ReasonMode::Scrap));
    ensure!(order.state() == WorkOrderState::InProgress);
    ensure!(order.pending_reason() == Some(ReasonMode::Scrap));
    ensure!(order.finished_at().is_none());
    Ok(())
}

#[rstest]
#[case(None)]
#[case(Some("   "))]
fn confirm_scrap_without_reason_is_rejected(
    #[case] reason: Option<&str>,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::InProgress, &clock)?;
    order.scrap(None, &clock)?;

    let result = order.confirm_reason(ReasonMode::Scrap, reason.map(str::to_owned), &clock);

    if result != Err(WorkOrderError::MissingReason(ReasonMode::Scrap)) {
        bail!("expected MissingReason, got {result:?}");
    }
    // The capture step stays open so the caller can try again.
    ensure!(order.state() == WorkOrderState::InProgress);
    ensure!(order.pending_reason() == Some(ReasonMode::Scrap));
    Ok(())
}

#[rstest]
fn confirm_scrap_with_reason_commits(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::InProgress, &clock)?;
    order.scrap(None, &clock)?;

    order.confirm_reason(ReasonMode::Scrap, Some("wrong alloy".to_owned()), &clock)?;

    ensure!(order.state() == WorkOrderState::Scrap);
    ensure!(order.scrap_reason() == Some("wrong alloy"));
    ensure!(order.finished_at().is_some());
    ensure!(order.pending_reason().is_none());
    Ok(())
}

#[rstest]
fn confirm_without_pending_step_is_rejected(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::InProgress, &clock)?;

    let result = order.confirm_reason(ReasonMode::Scrap, Some("text".to_owned()), &clock);
    let expected = Err(WorkOrderError::InvalidTransition {
        id: order.id(),
        from: WorkOrderState::InProgress,
        to: WorkOrderState::Scrap,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[rstest]
fn confirm_wrong_mode_is_rejected(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::InProgress, &clock)?;
    order.report_blocked(None, &clock)?;

    let result = order.confirm_reason(ReasonMode::Scrap, Some("text".to_owned()), &clock);

    ensure!(result.is_err());
    ensure!(order.pending_reason() == Some(ReasonMode::Blocked));
    ensure!(order.state() == WorkOrderState::InProgress);
    Ok(())
}

#[rstest]
#[case(WorkOrderState::Done)]
#[case(WorkOrderState::Scrap)]
fn report_blocked_rejected_after_finish(
    #[case] from: WorkOrderState,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;
    let result = order.report_blocked(Some("no materials".to_owned()), &clock);
    let expected = Err(WorkOrderError::AlreadyFinished {
        id: order.id(),
        state: from,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(order.state() == from);
    Ok(())
}

#[rstest]
fn report_blocked_with_reason_commits_without_finishing(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Ready, &clock)?;

    let phase = order.report_blocked(Some("no materials".to_owned()), &clock)?;

    ensure!(phase == ReasonPhase::Applied);
    ensure!(order.state() == WorkOrderState::Blocked);
    ensure!(order.fail_reason() == Some("no materials"));
    ensure!(order.finished_at().is_none());
    Ok(())
}

#[rstest]
fn blocked_order_accepts_an_updated_reason(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Blocked, &clock)?;

    let phase = order.report_blocked(Some("fixture broken too".to_owned()), &clock)?;

    ensure!(phase == ReasonPhase::Applied);
    ensure!(order.state() == WorkOrderState::Blocked);
    ensure!(order.fail_reason() == Some("fixture broken too"));
    Ok(())
}

#[rstest]
fn report_blocked_without_reason_suspends(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Ready, &clock)?;

    let phase = order.report_blocked(None, &clock)?;

    ensure!(phase == ReasonPhase::AwaitingReason(ReasonMode::Blocked));
    ensure!(order.state() == WorkOrderState::Ready);
    ensure!(order.pending_reason() == Some(ReasonMode::Blocked));
    Ok(())
}

#[rstest]
#[case(WorkOrderState::Scrap)]
#[case(WorkOrderState::Blocked)]
fn reset_returns_terminal_order_to_ready(
    #[case] from: WorkOrderState,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;

    order.reset(&clock)?;

    ensure!(order.state() == WorkOrderState::Ready);
    ensure!(order.operator().is_none());
    ensure!(order.started_at().is_none());
    ensure!(order.finished_at().is_none());
    // Reasons are retained for audit.
    if from == WorkOrderState::Scrap {
        ensure!(order.scrap_reason().is_some());
    } else {
        ensure!(order.fail_reason().is_some());
    }
    Ok(())
}

#[rstest]
fn write_guard_rejects_scrap_without_reason(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Scrap, &clock)?;
    order = strip_reasons(order);

    let result = order.check_write_invariants();

    if result != Err(WorkOrderError::MissingReason(ReasonMode::Scrap)) {
        bail!("expected MissingReason(scrap), got {result:?}");
    }
    Ok(())
}

#[rstest]
fn write_guard_rejects_blocked_without_reason(clock: DefaultClock) -> eyre::Result<()> {
    let mut order = order_in_state(WorkOrderState::Blocked, &clock)?;
    order = strip_reasons(order);

    let result = order.check_write_invariants();

    if result != Err(WorkOrderError::MissingReason(ReasonMode::Blocked)) {
        bail!("expected MissingReason(blocked), got {result:?}");
    }
    Ok(())
}

#[rstest]
fn write_guard_rejects_finish_before_start(clock: DefaultClock) -> eyre::Result<()> {
    let order = order_in_state(WorkOrderState::Done, &clock)?;
    let mut data = crate::workorder::domain::PersistedWorkOrder {
        id: order.id(),
        name: order.name().to_owned(),
        state: order.state(),
        operator: order.operator(),
        started_at: order.started_at(),
        finished_at: order.finished_at(),
        planned_start: None,
        planned_end: None,
        quantity: order.quantity(),
        scrap_reason: None,
        fail_reason: None,
        pending_reason: None,
        attachments: Vec::new(),
        created_at: order.created_at(),
        updated_at: order.updated_at(),
    };
    data.finished_at = data.started_at.map(|start| start - chrono::Duration::minutes(5));
    let doctored = WorkOrder::from_persisted(data);

    let result = doctored.check_write_invariants();

    if result != Err(WorkOrderError::InconsistentTimestamps(doctored.id())) {
        bail!("expected InconsistentTimestamps, got {result:?}");
    }
    Ok(())
}

/// Rebuilds the order with both reason fields blanked, bypassing the
/// transition methods the way a raw store write would.
fn strip_reasons(order: WorkOrder) -> WorkOrder {
    WorkOrder::from_persisted(crate::workorder::domain::PersistedWorkOrder {
        id: order.id(),
        name: order.name().to_owned(),
        state: order.state(),
        operator: order.operator(),
        started_at: order.started_at(),
        finished_at: order.finished_at(),
        planned_start: order.planned_start(),
        planned_end: order.planned_end(),
        quantity: order.quantity(),
        scrap_reason: None,
        fail_reason: None,
        pending_reason: None,
        attachments: order.attachments().to_vec(),
        created_at: order.created_at(),
        updated_at: order.updated_at(),
    })
}

#[rstest]
#[case(WorkOrderState::Ready)]
#[case(WorkOrderState::InProgress)]
#[case(WorkOrderState::Done)]
fn reset_rejected_outside_terminal_failures(
    #[case] from: WorkOrderState,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut order = order_in_state(from, &clock)?;
    let result = order.reset(&clock);
    let expected = Err(WorkOrderError::InvalidTransition {
        id: order.id(),
        from,
        to: WorkOrderState::Ready,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(order.state() == from);
    Ok(())
}
