#![warn(missing_docs)]
//! # fintrace-ui
//!
//! ## Purpose
//! Defines the view-facing projections of normalized analysis output.
//!
//! ## Responsibilities
//! - Sort and paginate normalized rings ([`sort_and_paginate`]).
//! - Encode the column-toggle rule as a pure value ([`SortState::select`],
//!   [`TableQuery`]).
//! - Format rings and summary counters into display-ready text.
//!
//! ## Data flow
//! Normalized rings + [`TableQuery`] -> [`RingPage`] -> [`RingRow`] /
//! [`RingDetail`] rendered by the dashboard shell.
//!
//! ## Ownership and lifetimes
//! Every projection returns owned values; nothing here holds on to the ring
//! list between calls, so the owning view layer keeps whatever state it likes.
//!
//! ## Error model
//! This crate favors explicit, clamped state over recoverable errors. Page
//! sizes and page numbers outside their valid range are clamped.

use std::cmp::Ordering;

use fintrace_analysis_contract::{MetricTone, RiskBand, SummaryMetric, risk_band};
use fintrace_core::NormalizedRing;
use serde::{Deserialize, Serialize};

/// Rings shown per table page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Sortable ring table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// `ringId` (text).
    RingId,
    /// `accountCount` (numeric).
    AccountCount,
    /// `pattern` (text).
    Pattern,
    /// `riskScore` (numeric).
    RiskScore,
    /// `totalAmount` (numeric).
    TotalAmount,
    /// `transactionCount` (numeric).
    TransactionCount,
}

impl SortKey {
    /// Every sortable column in table order.
    pub const ALL: [SortKey; 6] = [
        SortKey::RingId,
        SortKey::AccountCount,
        SortKey::Pattern,
        SortKey::RiskScore,
        SortKey::TotalAmount,
        SortKey::TransactionCount,
    ];

    /// Column name as used by the view layer.
    pub fn column(self) -> &'static str {
        match self {
            Self::RingId => "ringId",
            Self::AccountCount => "accountCount",
            Self::Pattern => "pattern",
            Self::RiskScore => "riskScore",
            Self::TotalAmount => "totalAmount",
            Self::TransactionCount => "transactionCount",
        }
    }

    /// Parses a column name. Accepts camelCase or snake_case.
    pub fn from_column(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('_', "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.column().to_ascii_lowercase() == wanted)
    }

    fn value(self, ring: &NormalizedRing) -> SortValue<'_> {
        match self {
            Self::RingId => SortValue::Text(&ring.ring_id),
            Self::AccountCount => SortValue::Number(ring.account_count as f64),
            Self::Pattern => SortValue::Text(&ring.pattern),
            Self::RiskScore => SortValue::Number(ring.risk_score),
            Self::TotalAmount => SortValue::Number(ring.total_amount),
            Self::TransactionCount => SortValue::Number(ring.transaction_count),
        }
    }
}

enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Low to high.
    Ascending,
    /// High to low.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    /// Active column.
    pub key: SortKey,
    /// Active direction.
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::RiskScore,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Applies a column selection.
    ///
    /// Selecting the active column flips direction; any other column becomes
    /// active in [`SortDirection::Descending`].
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Descending,
            }
        }
    }
}

/// Case-sensitive collation: case-insensitive first, lowercase before
/// uppercase on ties.
///
/// This approximates locale collation. After lowercasing, characters compare
/// by code point, so accented letters sort after `z` (`"zebra" < "école"`)
/// instead of next to their base letter.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| right.cmp(left))
}

fn compare_rings(left: &NormalizedRing, right: &NormalizedRing, key: SortKey) -> Ordering {
    match (key.value(left), key.value(right)) {
        (SortValue::Number(left), SortValue::Number(right)) => {
            left.partial_cmp(&right).unwrap_or(Ordering::Equal)
        }
        (SortValue::Text(left), SortValue::Text(right)) => locale_compare(left, right),
        _ => Ordering::Equal,
    }
}

/// Returns a stably sorted copy of `rings`.
///
/// Descending order reverses the comparator, not the output, so tied rings
/// keep their source order in both directions.
pub fn sort_rings(rings: &[NormalizedRing], sort: SortState) -> Vec<NormalizedRing> {
    let mut sorted = rings.to_vec();
    sorted.sort_by(|left, right| match sort.direction {
        SortDirection::Ascending => compare_rings(left, right, sort.key),
        SortDirection::Descending => compare_rings(right, left, sort.key),
    });
    sorted
}

/// Number of pages for `ring_count` rings; never below one.
pub fn page_count(ring_count: usize, page_size: usize) -> usize {
    ring_count.div_ceil(page_size.max(1)).max(1)
}

/// One table page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingPage {
    /// Rings on the page, in sorted order.
    pub page: Vec<NormalizedRing>,
    /// Total page count (at least one).
    pub page_count: usize,
    /// Requested page number clamped into `[1, page_count]`.
    pub clamped_page_number: usize,
}

/// Sorts `rings` and slices out one page.
///
/// A zero `page_size` is treated as one.
pub fn sort_and_paginate(
    rings: &[NormalizedRing],
    key: SortKey,
    direction: SortDirection,
    page_size: usize,
    page_number: usize,
) -> RingPage {
    let page_size = page_size.max(1);
    let page_count = page_count(rings.len(), page_size);
    let clamped_page_number = page_number.clamp(1, page_count);

    let sorted = sort_rings(rings, SortState { key, direction });
    let page = sorted
        .into_iter()
        .skip((clamped_page_number - 1) * page_size)
        .take(page_size)
        .collect();

    RingPage {
        page,
        page_count,
        clamped_page_number,
    }
}

/// Transient ring table query held by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    /// Active sort.
    pub sort: SortState,
    /// Requested page (1-based).
    pub page: usize,
    /// Rings per page.
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableQuery {
    /// Creates a query on page one with the default sort.
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: SortState::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Applies a column selection and returns to page one.
    pub fn select_sort(self, key: SortKey) -> Self {
        Self {
            sort: self.sort.select(key),
            page: 1,
            ..self
        }
    }

    /// Jumps to `page`, clamped against `ring_count`.
    pub fn go_to(self, page: usize, ring_count: usize) -> Self {
        Self {
            page: page.clamp(1, page_count(ring_count, self.page_size)),
            ..self
        }
    }

    /// Advances one page, stopping at the last.
    pub fn next_page(self, ring_count: usize) -> Self {
        self.go_to(self.page.saturating_add(1), ring_count)
    }

    /// Steps back one page, stopping at the first.
    pub fn previous_page(self, ring_count: usize) -> Self {
        self.go_to(self.page.saturating_sub(1), ring_count)
    }

    /// Evaluates the query against `rings`.
    pub fn apply(&self, rings: &[NormalizedRing]) -> RingPage {
        sort_and_paginate(
            rings,
            self.sort.key,
            self.sort.direction,
            self.page_size,
            self.page,
        )
    }
}

/// Ring table row with display-ready text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingRow {
    /// Ring id.
    pub ring_id: String,
    /// Member account count.
    pub account_count: usize,
    /// Pattern label.
    pub pattern: String,
    /// Risk score with two decimals.
    pub risk_score: String,
    /// Band driving the score colour.
    pub risk_band: RiskBand,
    /// Total amount with digit grouping.
    pub total_amount: String,
    /// Transaction count.
    pub transaction_count: String,
    /// Detection rationale.
    pub rationale: String,
}

impl From<&NormalizedRing> for RingRow {
    fn from(ring: &NormalizedRing) -> Self {
        Self {
            ring_id: ring.ring_id.clone(),
            account_count: ring.account_count,
            pattern: ring.pattern.clone(),
            risk_score: format!("{:.2}", ring.risk_score),
            risk_band: risk_band(ring.risk_score),
            total_amount: format_amount(ring.total_amount),
            transaction_count: format!("{}", ring.transaction_count),
            rationale: ring.rationale.clone(),
        }
    }
}

/// Expanded-row detail text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingDetail {
    /// Member accounts, comma separated.
    pub accounts: String,
    /// Flow path, arrow separated.
    pub path: String,
}

impl From<&NormalizedRing> for RingDetail {
    fn from(ring: &NormalizedRing) -> Self {
        let accounts = if ring.accounts.is_empty() {
            "No account list provided".to_string()
        } else {
            ring.accounts.join(", ")
        };

        let path = if ring.transaction_path.is_empty() {
            "No flow path provided".to_string()
        } else {
            ring.transaction_path.join(" → ")
        };

        Self { accounts, path }
    }
}

/// Summary counter card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    /// Card heading.
    pub label: String,
    /// Counter value as text.
    pub value: String,
    /// Card colouring.
    pub tone: MetricTone,
}

impl From<&SummaryMetric> for MetricCard {
    fn from(metric: &SummaryMetric) -> Self {
        Self {
            label: metric.label.clone(),
            value: format!("{}", metric.value),
            tone: metric.tone(),
        }
    }
}

/// Formats an amount with thousands separators and at most three fraction
/// digits, for example `1,234.5`.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 1000.0).round() / 1000.0;
    let digits = format!("{:.3}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 5);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}
