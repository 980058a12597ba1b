//! Integration tests for dashboard projection.

mod common;

use fintrace_analysis_contract::{MetricTone, RiskBand};
use fintrace_app::project_dashboard;
use fintrace_ui::{SortKey, TableQuery};

#[test]
fn dashboard_projection_tests_formats_first_page() {
    let view = common::fixture_view();
    let dashboard = project_dashboard(&view, TableQuery::default());

    assert_eq!(dashboard.table.page_count, 1);
    let ids: Vec<&str> = dashboard
        .table
        .rows
        .iter()
        .map(|row| row.ring_id.as_str())
        .collect();
    assert_eq!(ids, vec!["RING-001", "RING-002", "RING-3"]);

    let top = &dashboard.table.rows[0];
    assert_eq!(top.risk_score, "0.93");
    assert_eq!(top.risk_band, RiskBand::High);
    assert_eq!(top.total_amount, "15,200.5");
    assert_eq!(top.transaction_count, "3");

    let detail = &dashboard.table.details[0];
    assert_eq!(detail.accounts, "ACC_00123, ACC_00456, ACC_00789");
    assert_eq!(
        detail.path,
        "ACC_00123 → ACC_00456 → ACC_00789 → ACC_00123"
    );
}

#[test]
fn dashboard_projection_tests_clamps_requested_page() {
    let view = common::fixture_view();
    let query = TableQuery {
        page: 9,
        ..TableQuery::new(2).select_sort(SortKey::RingId)
    };

    let dashboard = project_dashboard(&view, query);
    assert_eq!(dashboard.table.page_count, 2);
    assert_eq!(dashboard.table.query.page, 2);
    assert_eq!(dashboard.table.rows.len(), 1);
}

#[test]
fn dashboard_projection_tests_summary_cards_carry_tone() {
    let view = common::fixture_view();
    let dashboard = project_dashboard(&view, TableQuery::default());

    assert_eq!(dashboard.summary.len(), 7);
    assert_eq!(dashboard.summary[0].tone, MetricTone::Neutral);
    assert_eq!(dashboard.summary[0].value, "7");
    assert_eq!(dashboard.summary[5].label, "Fan-out Patterns (1 to 10+)");
    assert_eq!(dashboard.summary[5].tone, MetricTone::Clear);
    assert_eq!(dashboard.summary[6].tone, MetricTone::Alert);
}
