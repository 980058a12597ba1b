#![warn(missing_docs)]
//! # fintrace-analysis-contract
//!
//! ## Purpose
//! Accepts the loosely-structured analysis payload produced by the detection
//! backend and turns its ring list and aggregates into canonical structures.
//!
//! ## Responsibilities
//! - Decode raw JSON and unwrap response envelopes ([`parse_analysis_payload`]).
//! - Normalize schema-ambiguous ring records ([`normalize_rings`]).
//! - Resolve the seven summary counters from backend aggregates or derive them
//!   from the normalized rings ([`derive_summary`]).
//! - Map ring risk scores to UI-safe bands ([`risk_band`]).
//!
//! ## Data flow
//! Raw JSON -> [`AnalysisPayload`] -> [`normalize_rings`] ->
//! [`derive_summary_with_rings`] -> dashboard projection.
//!
//! ## Ownership and lifetimes
//! [`AnalysisPayload`] owns the decoded tree. Normalized rings and metrics are
//! freshly allocated per call and never alias the payload.
//!
//! ## Error model
//! Only undecodable text fails ([`AnalysisContractError`]). Missing fields,
//! malformed numbers and non-object records degrade to defaults.

use fintrace_core::{
    MISSING_RATIONALE, NormalizedRing, RingField, UNKNOWN_PATTERN, parse_finite_number_or,
    placeholder_ring_id, resolve_field, string_list, text_value,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys the backend has used to wrap the analysis object, in priority order.
pub const ENVELOPE_KEYS: [&str; 3] = ["analysis", "result", "data"];

/// Decoded analysis payload with any response envelope removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisPayload {
    root: Map<String, Value>,
}

impl AnalysisPayload {
    /// Wraps an already-parsed JSON value.
    ///
    /// The first of [`ENVELOPE_KEYS`] holding an object replaces the root.
    /// A non-object value yields an empty payload.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut root) = value else {
            log::debug!("analysis payload root is not an object; treating it as empty");
            return Self::default();
        };

        let envelope = ENVELOPE_KEYS
            .into_iter()
            .find(|key| root.get(*key).is_some_and(Value::is_object));

        if let Some(key) = envelope {
            if let Some(Value::Object(inner)) = root.remove(key) {
                log::debug!("unwrapped analysis payload from '{key}' envelope");
                return Self { root: inner };
            }
        }

        Self { root }
    }

    /// Returns the unwrapped analysis object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Returns the unwrapped analysis as an owned JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Raw ring records, when `fraud_rings` is a list.
    pub fn fraud_rings(&self) -> Option<&[Value]> {
        self.list("fraud_rings")
    }

    /// Raw transactions, when `transactions` is a list.
    pub fn transactions(&self) -> Option<&[Value]> {
        self.list("transactions")
    }

    /// Flagged account list, when `suspicious_accounts` is a list.
    pub fn suspicious_accounts(&self) -> Option<&[Value]> {
        self.list("suspicious_accounts")
    }

    /// Backend aggregate block, when `summary` is an object.
    pub fn summary(&self) -> Option<&Map<String, Value>> {
        self.root.get("summary").and_then(Value::as_object)
    }

    fn list(&self, key: &str) -> Option<&[Value]> {
        self.root
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Decodes raw JSON text into an [`AnalysisPayload`].
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] when `raw` is not valid JSON.
pub fn parse_analysis_payload(raw: &str) -> Result<AnalysisPayload, AnalysisContractError> {
    let value: Value = serde_json::from_str(raw).map_err(AnalysisContractError::Decode)?;
    Ok(AnalysisPayload::from_value(value))
}

/// Normalizes raw ring records into canonical rings.
///
/// Absent or empty input yields an empty list. Each record is normalized
/// independently; a malformed record degrades to defaults instead of aborting
/// the batch.
pub fn normalize_rings(raw_rings: Option<&[Value]>) -> Vec<NormalizedRing> {
    raw_rings
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(position, raw)| normalize_ring(position, raw))
        .collect()
}

/// Normalizes the ring at zero-based `position` in the source list.
pub fn normalize_ring(position: usize, raw: &Value) -> NormalizedRing {
    let empty = Map::new();
    let record = match raw.as_object() {
        Some(record) => record,
        None => {
            log::debug!("ring record at position {position} is not an object; using defaults");
            &empty
        }
    };

    let ring_id = text_field(record, RingField::RingId).unwrap_or_else(|| {
        let placeholder = placeholder_ring_id(position);
        log::debug!("ring record at position {position} has no id; assigned {placeholder}");
        placeholder
    });
    let accounts = list_field(record, RingField::Accounts);

    NormalizedRing {
        ring_id,
        account_count: accounts.len(),
        accounts,
        pattern: text_field(record, RingField::Pattern)
            .unwrap_or_else(|| UNKNOWN_PATTERN.to_string()),
        risk_score: number_field(record, RingField::RiskScore),
        total_amount: number_field(record, RingField::TotalAmount),
        transaction_count: number_field(record, RingField::TransactionCount),
        rationale: text_field(record, RingField::Rationale)
            .unwrap_or_else(|| MISSING_RATIONALE.to_string()),
        transaction_path: list_field(record, RingField::TransactionPath),
    }
}

fn text_field(record: &Map<String, Value>, field: RingField) -> Option<String> {
    resolve_field(record, field)
        .and_then(|resolved| resolved.as_value())
        .and_then(text_value)
}

fn list_field(record: &Map<String, Value>, field: RingField) -> Vec<String> {
    resolve_field(record, field)
        .and_then(|resolved| resolved.as_value())
        .map(string_list)
        .unwrap_or_default()
}

fn number_field(record: &Map<String, Value>, field: RingField) -> f64 {
    resolve_field(record, field)
        .map(|resolved| resolved.to_number_or(0.0))
        .unwrap_or(0.0)
}

/// Summary counter, in fixed display order (see [`MetricKey::ALL`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Total transactions processed.
    TotalTransactions,
    /// Suspicious accounts flagged.
    SuspiciousAccounts,
    /// Fraud rings detected.
    FraudRings,
    /// Cycle-based structures.
    CycleStructures,
    /// Fan-in patterns.
    FanInPatterns,
    /// Fan-out patterns.
    FanOutPatterns,
    /// Shell-chain patterns.
    ShellChainPatterns,
}

impl MetricKey {
    /// Every counter in display order.
    pub const ALL: [MetricKey; 7] = [
        MetricKey::TotalTransactions,
        MetricKey::SuspiciousAccounts,
        MetricKey::FraudRings,
        MetricKey::CycleStructures,
        MetricKey::FanInPatterns,
        MetricKey::FanOutPatterns,
        MetricKey::ShellChainPatterns,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::TotalTransactions => "Total Transactions Processed",
            Self::SuspiciousAccounts => "Suspicious Accounts Identified",
            Self::FraudRings => "Total Fraud Rings Detected",
            Self::CycleStructures => "Cycle-Based Structures (3-5)",
            Self::FanInPatterns => "Fan-in Patterns (10+ to 1)",
            Self::FanOutPatterns => "Fan-out Patterns (1 to 10+)",
            Self::ShellChainPatterns => "Shell Chain Patterns",
        }
    }

    /// Keys checked in the backend `summary` block, in priority order.
    pub fn summary_keys(self) -> &'static [&'static str] {
        match self {
            Self::TotalTransactions => &["total_transactions_processed", "total_transactions"],
            Self::SuspiciousAccounts => &["suspicious_accounts_flagged", "suspicious_accounts"],
            Self::FraudRings => &["fraud_rings_detected"],
            Self::CycleStructures => &["cycle_based_structures", "cycle_structures"],
            Self::FanInPatterns => &["fan_in_patterns", "fan_in_count"],
            Self::FanOutPatterns => &["fan_out_patterns", "fan_out_count"],
            Self::ShellChainPatterns => &["shell_chain_patterns", "shell_chain_count"],
        }
    }

    /// Presentation variant.
    pub fn variant(self) -> MetricVariant {
        match self {
            Self::TotalTransactions => MetricVariant::Neutral,
            _ => MetricVariant::Risk,
        }
    }
}

/// Whether a counter is informational or a risk indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricVariant {
    /// Informational volume counter.
    Neutral,
    /// Counter where any non-zero value warrants attention.
    Risk,
}

/// Display tone derived from variant and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricTone {
    /// Informational.
    Neutral,
    /// Risk counter above zero.
    Alert,
    /// Risk counter at zero.
    Clear,
}

/// One resolved summary counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric {
    /// Counter identity.
    pub key: MetricKey,
    /// Display label.
    pub label: String,
    /// Finite counter value.
    pub value: f64,
    /// Presentation variant.
    pub variant: MetricVariant,
}

impl SummaryMetric {
    /// Returns the display tone for this counter.
    pub fn tone(&self) -> MetricTone {
        match self.variant {
            MetricVariant::Neutral => MetricTone::Neutral,
            MetricVariant::Risk if self.value > 0.0 => MetricTone::Alert,
            MetricVariant::Risk => MetricTone::Clear,
        }
    }
}

/// Finds one counter in a derived summary.
pub fn find_metric(metrics: &[SummaryMetric], key: MetricKey) -> Option<&SummaryMetric> {
    metrics.iter().find(|metric| metric.key == key)
}

/// Ring counts per structural pattern.
///
/// Categories overlap: one label may count towards several of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCounts {
    /// Labels containing `cycle`.
    pub cycle: usize,
    /// Labels containing `fan-in`, `fanin` or `fan in`.
    pub fan_in: usize,
    /// Labels containing `fan-out`, `fanout` or `fan out`.
    pub fan_out: usize,
    /// Labels containing `shell` or `chain`.
    pub shell_chain: usize,
}

/// Counts pattern categories across normalized rings (case-insensitive
/// substring match on the pattern label).
pub fn count_patterns(rings: &[NormalizedRing]) -> PatternCounts {
    let mut counts = PatternCounts::default();

    for ring in rings {
        let label = ring.pattern.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|needle| label.contains(needle));

        if label.contains("cycle") {
            counts.cycle += 1;
        }
        if contains_any(&["fan-in", "fanin", "fan in"]) {
            counts.fan_in += 1;
        }
        if contains_any(&["fan-out", "fanout", "fan out"]) {
            counts.fan_out += 1;
        }
        if contains_any(&["shell", "chain"]) {
            counts.shell_chain += 1;
        }
    }

    counts
}

/// Resolves the seven summary counters for `payload`.
///
/// Normalizes the payload's rings internally; callers that already hold the
/// normalized list should use [`derive_summary_with_rings`].
pub fn derive_summary(payload: &AnalysisPayload) -> Vec<SummaryMetric> {
    let rings = normalize_rings(payload.fraud_rings());
    derive_summary_with_rings(payload, &rings)
}

/// Resolves the seven summary counters using already-normalized `rings`.
///
/// # Semantics
/// Per counter: first non-null backend value (coerced, malformed -> `0`),
/// else the derived value, else `0`. Output order is [`MetricKey::ALL`].
pub fn derive_summary_with_rings(
    payload: &AnalysisPayload,
    rings: &[NormalizedRing],
) -> Vec<SummaryMetric> {
    let summary = payload.summary();
    let patterns = count_patterns(rings);

    MetricKey::ALL
        .iter()
        .map(|&key| {
            let explicit = summary.and_then(|block| {
                key.summary_keys()
                    .iter()
                    .find_map(|name| block.get(*name).filter(|value| !value.is_null()))
            });

            let value = match explicit {
                Some(value) => parse_finite_number_or(Some(value), 0.0),
                None => derived_count(key, payload, rings, &patterns).unwrap_or(0) as f64,
            };

            SummaryMetric {
                key,
                label: key.label().to_string(),
                value,
                variant: key.variant(),
            }
        })
        .collect()
}

fn derived_count(
    key: MetricKey,
    payload: &AnalysisPayload,
    rings: &[NormalizedRing],
    patterns: &PatternCounts,
) -> Option<usize> {
    match key {
        MetricKey::TotalTransactions => payload.transactions().map(<[Value]>::len),
        MetricKey::SuspiciousAccounts => payload.suspicious_accounts().map(<[Value]>::len),
        MetricKey::FraudRings => Some(rings.len()),
        MetricKey::CycleStructures => Some(patterns.cycle),
        MetricKey::FanInPatterns => Some(patterns.fan_in),
        MetricKey::FanOutPatterns => Some(patterns.fan_out),
        MetricKey::ShellChainPatterns => Some(patterns.shell_chain),
    }
}

/// UI-safe risk band for a ring score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Score below `0.5`.
    Low,
    /// Score in `[0.5, 0.8]`.
    Elevated,
    /// Score above `0.8`.
    High,
}

/// Maps a risk score to its band.
pub fn risk_band(score: f64) -> RiskBand {
    if score > 0.8 {
        RiskBand::High
    } else if score >= 0.5 {
        RiskBand::Elevated
    } else {
        RiskBand::Low
    }
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}
