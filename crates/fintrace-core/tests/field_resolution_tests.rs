//! Tests ordered alternate-key resolution for ring fields.

use fintrace_core::{FieldSource, RingField, Resolved, resolve_field, sources_for};
use serde_json::json;

#[test]
fn field_resolution_tests_prefers_earlier_keys() {
    let record = json!({
        "rationale": "primary",
        "detection_rationale": "secondary",
        "explanation": "tertiary"
    });
    let record = record.as_object().expect("fixture should be an object");

    let resolved = resolve_field(record, RingField::Rationale).expect("rationale should resolve");
    assert_eq!(resolved.as_value(), Some(&json!("primary")));
}

#[test]
fn field_resolution_tests_first_present_value_wins_even_if_malformed() {
    let record = json!({ "risk_score": "abc", "risk": 0.7 });
    let record = record.as_object().expect("fixture should be an object");

    let resolved = resolve_field(record, RingField::RiskScore).expect("risk should resolve");
    assert_eq!(resolved.to_number_or(0.0), 0.0);
}

#[test]
fn field_resolution_tests_explicit_count_beats_list_length() {
    let record = json!({ "num_transactions": 2, "transactions": [{}, {}, {}] });
    let record = record.as_object().expect("fixture should be an object");

    assert_eq!(
        resolve_field(record, RingField::TransactionCount),
        Some(Resolved::Value(&json!(2)))
    );
    assert_eq!(
        sources_for(RingField::TransactionCount).last(),
        Some(&FieldSource::LengthOf("transactions"))
    );
}
