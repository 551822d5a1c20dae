//! Counter-aggregation and performance-view tests.

use std::sync::Arc;

use crate::workorder::{
    adapters::memory::InMemoryOperatorDirectory,
    domain::{Capability, CounterDelta, Operator, OperatorId, OperatorStats},
    ports::OperatorDirectory,
    services::StatsService,
};
use rstest::rstest;

async fn directory_with(
    operators: &[(OperatorId, &str)],
) -> Arc<InMemoryOperatorDirectory> {
    let directory = Arc::new(InMemoryOperatorDirectory::new());
    for (id, name) in operators {
        directory
            .insert(&Operator::new(*id, *name, vec![Capability::Operator]))
            .await
            .expect("registration should succeed");
    }
    directory
}

#[rstest]
fn stats_fold_accumulates_each_component() {
    let mut stats = OperatorStats::default();

    stats.apply(CounterDelta::new(1.5, 1, 0));
    stats.apply(CounterDelta::new(0.0, 0, 1));
    stats.apply(CounterDelta::new(2.25, 2, 0));

    assert_eq!(stats.tasks_done, 3);
    assert_eq!(stats.tasks_scrap, 1);
    assert!((stats.hours_logged - 3.75).abs() < 1e-9);
}

#[rstest]
fn partial_delta_leaves_other_counters_untouched() {
    let mut stats = OperatorStats {
        hours_logged: 10.0,
        tasks_done: 4,
        tasks_scrap: 2,
    };

    stats.apply(CounterDelta::new(0.0, 1, 0));

    assert_eq!(stats.tasks_done, 5);
    assert_eq!(stats.tasks_scrap, 2);
    assert!((stats.hours_logged - 10.0).abs() < 1e-9);
}

#[rstest]
#[case(0, 0, 0.0)]
#[case(3, 1, 25.0)]
#[case(0, 5, 100.0)]
#[case(1, 1, 50.0)]
fn defect_percentage_over_finished_work(
    #[case] done: u64,
    #[case] scrap: u64,
    #[case] expected: f64,
) {
    let stats = OperatorStats {
        hours_logged: 0.0,
        tasks_done: done,
        tasks_scrap: scrap,
    };
    assert!((stats.defect_pct() - expected).abs() < 1e-9);
}

#[rstest]
fn hours_render_to_two_decimals() {
    let stats = OperatorStats {
        hours_logged: 12.5,
        tasks_done: 0,
        tasks_scrap: 0,
    };
    assert_eq!(stats.hours_formatted(), "12.50");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_counters_folds_into_the_directory() {
    let operator = OperatorId::new();
    let directory = directory_with(&[(operator, "Op 1")]).await;
    let service = StatsService::new(Arc::clone(&directory));

    service
        .apply_counters(operator, CounterDelta::new(0.5, 1, 0))
        .await
        .expect("fold should succeed");
    service
        .apply_counters(operator, CounterDelta::new(0.25, 0, 1))
        .await
        .expect("fold should succeed");

    let stored = directory
        .find_by_id(operator)
        .await
        .expect("lookup should succeed")
        .expect("operator exists");
    assert_eq!(stored.stats().tasks_done, 1);
    assert_eq!(stored.stats().tasks_scrap, 1);
    assert!((stored.stats().hours_logged - 0.75).abs() < 1e-9);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_operator_fold_is_a_silent_noop() {
    let directory = directory_with(&[]).await;
    let service = StatsService::new(Arc::clone(&directory));

    service
        .apply_counters(OperatorId::new(), CounterDelta::new(1.0, 1, 1))
        .await
        .expect("fold should be a no-op");

    assert!(directory.list().await.expect("listing should succeed").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn performance_report_lists_operators_sorted_by_name() {
    let op_b = OperatorId::new();
    let op_a = OperatorId::new();
    let directory = directory_with(&[(op_b, "Boris"), (op_a, "Anna")]).await;
    let service = StatsService::new(Arc::clone(&directory));

    service
        .apply_counters(op_b, CounterDelta::new(8.0, 3, 1))
        .await
        .expect("fold should succeed");

    let report = service.performance_report().await.expect("report should build");

    assert_eq!(report.len(), 2);
    let names: Vec<&str> = report.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Boris"]);

    let boris = report.iter().find(|row| row.operator == op_b).expect("row exists");
    assert_eq!(boris.tasks_done, 3);
    assert_eq!(boris.tasks_scrap, 1);
    assert!((boris.defect_pct - 25.0).abs() < 1e-9);
    assert_eq!(boris.hours, "8.00");

    let anna = report.iter().find(|row| row.operator == op_a).expect("row exists");
    assert_eq!(anna.tasks_done, 0);
    assert!((anna.defect_pct - 0.0).abs() < 1e-9);
    assert_eq!(anna.hours, "0.00");
}
