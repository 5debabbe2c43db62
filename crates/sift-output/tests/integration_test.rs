//! Integration tests for summaries, exports and reports of engine output.

use chrono::{Duration, NaiveDate};
use sift_output::{
    DecisionExport, ExportFormat, Exporter, QualificationSummary, ReportBuilder,
};
use sift_panel::schema::PRODUCT_ID;
use sift_panel::{OptionalSignals, PanelRecord, records_to_frame};
use sift_rules::{GatePolicy, PolicyKind, evaluate_by_product};

fn panel() -> polars::prelude::DataFrame {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut records = Vec::new();
    for (product, inventory) in [("stocked", 40.0), ("empty", 0.0)] {
        for day in 0..40 {
            records.push(PanelRecord {
                product_id: Some(product.to_string()),
                date: start + Duration::days(day),
                sales: Some(4.0),
                launch_date: start - Duration::days(5),
                margin: Some(0.25),
                inventory: Some(inventory),
                current_price: Some(9.0),
                cost: Some(6.0),
                is_stockout: Some(0.0),
                markdown_pct: Some(0.35),
            });
        }
    }
    records_to_frame(&records, OptionalSignals::all(), true).unwrap()
}

#[test]
fn test_full_clearance_reporting_workflow() {
    let policy = GatePolicy::with_defaults(PolicyKind::InventoryClearanceGate);
    let out = evaluate_by_product(&panel(), PRODUCT_ID, &policy).unwrap();

    let summary = QualificationSummary::from_frame(&out, policy.kind(), Some(PRODUCT_ID)).unwrap();
    assert_eq!(summary.products, Some(2));
    assert_eq!(summary.total_rows, 80);
    // "stocked" qualifies from row 27 once margin history is full.
    assert_eq!(summary.qualified_rows, 13);
    let inventory = &summary.criteria[0];
    assert_eq!(inventory.column, "pass_inventory");
    assert_eq!(inventory.failed, 40);
    assert_eq!(inventory.unknown, 0);

    let ascii = summary.to_ascii_table();
    assert!(ascii.contains("inventory_clearance_gate"));
    assert!(ascii.contains("Clearance Sales"));

    let decisions = DecisionExport::from_frame(&out, policy.kind(), Some(PRODUCT_ID)).unwrap();
    assert_eq!(decisions.len(), 80);
    assert_eq!(decisions.iter().filter(|d| d.should_forecast).count(), 13);
    let csv = decisions.export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 81);
    assert!(csv.contains("empty,2024-01-01,false,pass_inventory,"));

    let report = ReportBuilder::new()
        .title("clearance run")
        .policy(policy.kind())
        .section("policy", &policy)
        .unwrap()
        .section("summary", &summary)
        .unwrap()
        .build();
    let json = report.to_json().unwrap();
    assert!(json.contains("\"qualified_rows\": 13"));
    assert!(json.contains("\"clearance_rule\": \"required\""));
}

#[test]
fn test_summary_csv_export() {
    let policy = GatePolicy::default();
    let out = evaluate_by_product(&panel(), PRODUCT_ID, &policy).unwrap();
    let summary = QualificationSummary::from_frame(&out, policy.kind(), Some(PRODUCT_ID)).unwrap();

    let csv = summary.export_to_string(ExportFormat::Csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("policy,criterion,failed,unknown,failed_pct"));
    assert!(lines.next().unwrap().starts_with("strict_gate,pass_sales_recency,26,26,"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn test_custom_product_key_survives_reporting() {
    let mut keyed = panel();
    keyed.rename(PRODUCT_ID, "sku".into()).unwrap();
    let policy = GatePolicy::with_defaults(PolicyKind::InventoryClearanceGate);
    let out = evaluate_by_product(&keyed, "sku", &policy).unwrap();

    let summary = QualificationSummary::from_frame(&out, policy.kind(), Some("sku")).unwrap();
    assert_eq!(summary.products, Some(2));

    let decisions = DecisionExport::from_frame(&out, policy.kind(), Some("sku")).unwrap();
    assert_eq!(decisions[0].product_id.as_deref(), Some("stocked"));
    assert_eq!(decisions[40].product_id.as_deref(), Some("empty"));
}
