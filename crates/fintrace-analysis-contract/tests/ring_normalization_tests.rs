//! Tests ring normalization over malformed and mixed-schema records.

use fintrace_analysis_contract::normalize_rings;
use serde_json::{Value, json};

fn malformed_rings() -> Vec<Value> {
    vec![
        json!({}),
        json!(null),
        json!("RING-X"),
        json!({ "ring_id": "", "id": 17, "accounts": "ACC_1", "risk_score": [0.9] }),
        json!({ "member_accounts": [1, "B", { "nested": true }], "total_amount": "12,000" }),
        json!({ "pattern_type": null, "pattern": "fan-out", "flow_path": null, "path": "A -> B" }),
    ]
}

#[test]
fn ring_normalization_tests_every_field_is_populated() {
    let rings = normalize_rings(Some(malformed_rings().as_slice()));
    assert_eq!(rings.len(), 6);

    for ring in &rings {
        assert!(!ring.ring_id.is_empty());
        assert!(!ring.pattern.is_empty());
        assert!(!ring.rationale.is_empty());
        assert!(ring.risk_score.is_finite());
        assert!(ring.total_amount.is_finite());
        assert!(ring.transaction_count.is_finite());
        assert_eq!(ring.account_count, ring.accounts.len());
    }
}

#[test]
fn ring_normalization_tests_degrades_field_by_field() {
    let rings = normalize_rings(Some(malformed_rings().as_slice()));

    assert_eq!(rings[1].ring_id, "RING-2");
    assert_eq!(rings[3].ring_id, "17");
    assert_eq!(rings[3].accounts, vec!["ACC_1"]);
    assert_eq!(rings[3].risk_score, 0.0);
    assert_eq!(rings[4].accounts, vec!["1", "B"]);
    assert_eq!(rings[4].total_amount, 0.0);
    assert_eq!(rings[5].pattern, "fan-out");
    assert_eq!(rings[5].transaction_path, vec!["A -> B"]);
}

#[test]
fn ring_normalization_tests_is_deterministic() {
    let raw = malformed_rings();
    assert_eq!(normalize_rings(Some(raw.as_slice())), normalize_rings(Some(raw.as_slice())));
}

#[test]
fn ring_normalization_tests_blank_lists_fall_through_to_alternate_keys() {
    let raw = vec![json!({
        "member_accounts": "",
        "accounts": ["A", "B"],
        "transaction_path": "",
        "flow_path": ["A", "B"]
    })];
    let rings = normalize_rings(Some(raw.as_slice()));

    assert_eq!(rings[0].accounts, vec!["A", "B"]);
    assert_eq!(rings[0].account_count, 2);
    assert_eq!(rings[0].transaction_path, vec!["A", "B"]);
}

#[test]
fn ring_normalization_tests_blank_list_without_alternate_is_empty() {
    let raw = vec![json!({ "accounts": " ", "path": "" })];
    let rings = normalize_rings(Some(raw.as_slice()));

    assert!(rings[0].accounts.is_empty());
    assert_eq!(rings[0].account_count, 0);
    assert!(rings[0].transaction_path.is_empty());
}

#[test]
fn ring_normalization_tests_falsy_ids_use_placeholder() {
    let raw = vec![
        json!({ "ring_id": 0 }),
        json!({ "ring_id": false, "id": 0 }),
        json!({ "id": 4.0 }),
    ];
    let rings = normalize_rings(Some(raw.as_slice()));

    assert_eq!(rings[0].ring_id, "RING-1");
    assert_eq!(rings[1].ring_id, "RING-2");
    assert_eq!(rings[2].ring_id, "4");
}
