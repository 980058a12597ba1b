#![warn(missing_docs)]
//! # fintrace-core
//!
//! ## Purpose
//! Defines the pure data model and value coercion rules shared across the
//! `fintrace` workspace.
//!
//! ## Responsibilities
//! - Represent the canonical [`NormalizedRing`] handed to rendering and export.
//! - Declare, per canonical ring field, the ordered list of alternate source
//!   keys the analysis backend has used for it ([`RING_FIELD_SOURCES`]).
//! - Resolve one field from a raw record through that list
//!   ([`resolve_field`]).
//! - Coerce loosely-typed JSON scalars into finite numbers, text and string
//!   lists without ever failing ([`parse_finite_number_or`], [`text_value`],
//!   [`string_list`]).
//!
//! ## Data flow
//! Raw ring record (`serde_json::Map`) -> [`resolve_field`] per [`RingField`] ->
//! coercion helpers -> [`NormalizedRing`] assembled by the analysis contract.
//!
//! ## Ownership and lifetimes
//! Resolution borrows from the raw record ([`Resolved`]); coercion copies into
//! owned values so normalized output never borrows the transient payload.
//!
//! ## Error model
//! Nothing here is fallible. Missing fields resolve to `None` and malformed
//! numbers collapse to the caller's default.
//!
//! ## Example
//! ```rust
//! use fintrace_core::{RingField, parse_finite_number_or, resolve_field};
//! use serde_json::json;
//!
//! let record = json!({ "risk": "0.75", "risk_score": null });
//! let record = record.as_object().unwrap();
//! let resolved = resolve_field(record, RingField::RiskScore).unwrap();
//! assert_eq!(parse_finite_number_or(resolved.as_value(), 0.0), 0.75);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Pattern label used when a ring carries none.
pub const UNKNOWN_PATTERN: &str = "Unknown";

/// Rationale text used when a ring carries none.
pub const MISSING_RATIONALE: &str = "No rationale provided";

/// Canonical, display-ready fraud ring.
///
/// Every field is always populated; see [`RingField`] for where each one is
/// sourced from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRing {
    /// Stable ring identifier, or `RING-<n>` when the record has none.
    pub ring_id: String,
    /// Member account identifiers in source order.
    pub accounts: Vec<String>,
    /// Always `accounts.len()`; never read from the record.
    pub account_count: usize,
    /// Pattern label, or [`UNKNOWN_PATTERN`].
    pub pattern: String,
    /// Finite risk score, `0` when missing or malformed.
    pub risk_score: f64,
    /// Finite total moved through the ring, `0` when missing or malformed.
    pub total_amount: f64,
    /// Finite transaction count, `0` when missing or malformed.
    pub transaction_count: f64,
    /// Detection rationale, or [`MISSING_RATIONALE`].
    pub rationale: String,
    /// Ordered account hops through the ring.
    pub transaction_path: Vec<String>,
}

/// Positional placeholder id for the ring at zero-based `position`.
pub fn placeholder_ring_id(position: usize) -> String {
    format!("RING-{}", position + 1)
}

/// Canonical ring field resolved from a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingField {
    /// `ringId`.
    RingId,
    /// `accounts`.
    Accounts,
    /// `pattern`.
    Pattern,
    /// `riskScore`.
    RiskScore,
    /// `totalAmount`.
    TotalAmount,
    /// `transactionCount`.
    TransactionCount,
    /// `rationale`.
    Rationale,
    /// `transactionPath`.
    TransactionPath,
}

impl RingField {
    /// Returns `true` for free-text fields.
    pub fn is_text(self) -> bool {
        matches!(self, Self::RingId | Self::Pattern | Self::Rationale)
    }

    /// Returns `true` for identifier-list fields.
    pub fn is_list(self) -> bool {
        matches!(self, Self::Accounts | Self::TransactionPath)
    }

    /// Returns `true` when `value` should be passed over in favour of the next
    /// candidate key. Numeric fields only skip `null`; text and list fields
    /// also skip blank strings, `false` and zero.
    pub fn skips(self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            _ if !(self.is_text() || self.is_list()) => false,
            Value::String(text) => text.trim().is_empty(),
            Value::Bool(flag) => !flag,
            Value::Number(number) => number.as_f64() == Some(0.0),
            Value::Array(_) | Value::Object(_) => false,
        }
    }
}

/// One candidate source for a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Value stored under this key.
    Key(&'static str),
    /// Length of the list stored under this key.
    LengthOf(&'static str),
}

/// Ordered candidate sources per canonical ring field. Earlier entries win.
pub const RING_FIELD_SOURCES: &[(RingField, &[FieldSource])] = &[
    (
        RingField::RingId,
        &[FieldSource::Key("ring_id"), FieldSource::Key("id")],
    ),
    (
        RingField::Accounts,
        &[
            FieldSource::Key("member_accounts"),
            FieldSource::Key("accounts"),
        ],
    ),
    (
        RingField::Pattern,
        &[FieldSource::Key("pattern_type"), FieldSource::Key("pattern")],
    ),
    (
        RingField::RiskScore,
        &[FieldSource::Key("risk_score"), FieldSource::Key("risk")],
    ),
    (
        RingField::TotalAmount,
        &[
            FieldSource::Key("total_transaction_amount"),
            FieldSource::Key("total_amount"),
        ],
    ),
    (
        RingField::TransactionCount,
        &[
            FieldSource::Key("transaction_count"),
            FieldSource::Key("num_transactions"),
            FieldSource::LengthOf("transactions"),
        ],
    ),
    (
        RingField::Rationale,
        &[
            FieldSource::Key("rationale"),
            FieldSource::Key("detection_rationale"),
            FieldSource::Key("explanation"),
        ],
    ),
    (
        RingField::TransactionPath,
        &[
            FieldSource::Key("transaction_path"),
            FieldSource::Key("flow_path"),
            FieldSource::Key("path"),
        ],
    ),
];

/// Returns the candidate sources for `field`.
pub fn sources_for(field: RingField) -> &'static [FieldSource] {
    RING_FIELD_SOURCES
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map(|(_, sources)| *sources)
        .unwrap_or(&[])
}

/// Outcome of resolving one field against a raw record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// A present, non-null value found under a [`FieldSource::Key`].
    Value(&'a Value),
    /// Length of a list found under a [`FieldSource::LengthOf`].
    Length(usize),
}

impl<'a> Resolved<'a> {
    /// Returns the borrowed value, or `None` for a derived length.
    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Self::Value(value) => Some(*value),
            Self::Length(_) => None,
        }
    }

    /// Coerces the resolution to a finite number.
    pub fn to_number_or(self, default: f64) -> f64 {
        match self {
            Self::Value(value) => parse_finite_number_or(Some(value), default),
            Self::Length(length) => length as f64,
        }
    }
}

/// Resolves `field` against `record`, walking its candidate sources in order.
///
/// # Semantics
/// - `null` never wins; resolution continues with the next source.
/// - For text and list fields blank strings, `false` and zero are skipped too
///   ([`RingField::skips`]). An empty list still wins.
/// - [`FieldSource::LengthOf`] only matches when the key holds a list.
/// - The first match wins, even if it later coerces to a default (for example
///   `"risk_score": "abc"` shadows a valid `"risk"`).
pub fn resolve_field(record: &Map<String, Value>, field: RingField) -> Option<Resolved<'_>> {
    for source in sources_for(field) {
        match *source {
            FieldSource::Key(key) => match record.get(key) {
                Some(value) if !field.skips(value) => return Some(Resolved::Value(value)),
                _ => continue,
            },
            FieldSource::LengthOf(key) => {
                if let Some(Value::Array(items)) = record.get(key) {
                    return Some(Resolved::Length(items.len()));
                }
            }
        }
    }

    None
}

/// Parses `value` as a finite number, substituting `default` otherwise.
///
/// # Semantics
/// - JSON numbers are taken as-is.
/// - Strings are trimmed and parsed as decimal floats; blank strings, `NaN`
///   and infinities fall back to `default`.
/// - Booleans map to `1` and `0`.
/// - `null`, lists, objects and absent values fall back to `default`.
pub fn parse_finite_number_or(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed.filter(|number| number.is_finite()).unwrap_or(default)
}

/// Renders a JSON number as an identifier. Integral floats drop their
/// fraction so `1` and `1.0` name the same account.
pub fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

/// Renders a scalar as text. Lists, objects and `null` yield `None`.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number_text(number)),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Collects a list of identifiers in source order.
///
/// A bare scalar is treated as a one-element list; a blank string is an empty
/// list. Non-scalar list items are dropped; anything else yields an empty
/// list.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_value).collect(),
        Value::String(text) if text.trim().is_empty() => Vec::new(),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            text_value(value).into_iter().collect()
        }
        Value::Null | Value::Object(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for field resolution and coercion.

    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fixture should be an object")
    }

    #[test]
    fn every_field_has_sources() {
        for field in [
            RingField::RingId,
            RingField::Accounts,
            RingField::Pattern,
            RingField::RiskScore,
            RingField::TotalAmount,
            RingField::TransactionCount,
            RingField::Rationale,
            RingField::TransactionPath,
        ] {
            assert!(!sources_for(field).is_empty(), "{field:?} has no sources");
        }
    }

    #[test]
    fn null_falls_through_to_next_key() {
        let raw = record(json!({ "ring_id": null, "id": "R-9" }));
        let resolved = resolve_field(&raw, RingField::RingId).expect("id should resolve");
        assert_eq!(resolved, Resolved::Value(&json!("R-9")));
    }

    #[test]
    fn blank_text_is_skipped_but_empty_list_is_kept() {
        let raw = record(json!({
            "pattern_type": "  ",
            "pattern": "cycle",
            "member_accounts": [],
            "accounts": ["A"]
        }));

        let pattern = resolve_field(&raw, RingField::Pattern).expect("pattern should resolve");
        assert_eq!(pattern.as_value(), Some(&json!("cycle")));

        let accounts = resolve_field(&raw, RingField::Accounts).expect("accounts should resolve");
        assert_eq!(accounts.as_value(), Some(&json!([])));
    }

    #[test]
    fn transaction_count_falls_back_to_list_length() {
        let raw = record(json!({ "transactions": [{}, {}, {}] }));
        let resolved =
            resolve_field(&raw, RingField::TransactionCount).expect("length should resolve");
        assert_eq!(resolved, Resolved::Length(3));
        assert_eq!(resolved.to_number_or(0.0), 3.0);
    }

    #[test]
    fn length_source_ignores_non_lists() {
        let raw = record(json!({ "transactions": "many" }));
        assert_eq!(resolve_field(&raw, RingField::TransactionCount), None);
    }

    #[test]
    fn coercion_accepts_numeric_strings_and_rejects_garbage() {
        assert_eq!(parse_finite_number_or(Some(&json!(" 12.5 ")), 0.0), 12.5);
        assert_eq!(parse_finite_number_or(Some(&json!("abc")), 0.0), 0.0);
        assert_eq!(parse_finite_number_or(Some(&json!("NaN")), 0.0), 0.0);
        assert_eq!(parse_finite_number_or(Some(&json!("inf")), 0.0), 0.0);
        assert_eq!(parse_finite_number_or(Some(&json!([1])), 4.0), 4.0);
        assert_eq!(parse_finite_number_or(Some(&json!(true)), 0.0), 1.0);
        assert_eq!(parse_finite_number_or(None, 0.0), 0.0);
    }

    #[test]
    fn string_list_keeps_order_and_scalars() {
        assert_eq!(
            string_list(&json!(["B", 7, null, "A"])),
            vec!["B".to_string(), "7".to_string(), "A".to_string()]
        );
        assert_eq!(string_list(&json!("A -> B")), vec!["A -> B".to_string()]);
        assert!(string_list(&json!("  ")).is_empty());
        assert!(string_list(&json!({ "a": 1 })).is_empty());
    }

    #[test]
    fn blank_list_value_falls_through_to_next_key() {
        let raw = record(json!({
            "member_accounts": "",
            "accounts": ["A", "B"],
            "transaction_path": false,
            "flow_path": ["A", "B"]
        }));

        let accounts = resolve_field(&raw, RingField::Accounts).expect("accounts should resolve");
        assert_eq!(accounts.as_value(), Some(&json!(["A", "B"])));
        let path = resolve_field(&raw, RingField::TransactionPath).expect("path should resolve");
        assert_eq!(path.as_value(), Some(&json!(["A", "B"])));
    }

    #[test]
    fn zero_and_false_ids_are_skipped_but_numeric_zero_still_counts() {
        let raw = record(json!({ "ring_id": 0, "id": false, "risk_score": 0, "risk": 0.9 }));
        assert_eq!(resolve_field(&raw, RingField::RingId), None);

        let risk = resolve_field(&raw, RingField::RiskScore).expect("risk should resolve");
        assert_eq!(risk.to_number_or(1.0), 0.0);
    }

    #[test]
    fn integral_floats_render_like_integers() {
        assert_eq!(text_value(&json!(1.0)), Some("1".to_string()));
        assert_eq!(text_value(&json!(1)), Some("1".to_string()));
        assert_eq!(text_value(&json!(2.5)), Some("2.5".to_string()));
    }
}
