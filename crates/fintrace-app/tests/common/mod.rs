//! Shared fixtures for app integration tests.

use fintrace_app::{AnalysisView, analyze_payload};

/// Raw analysis payload mixing current and legacy ring field names.
#[allow(dead_code)]
pub fn fixture_raw() -> &'static str {
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../contracts/fixtures/analysis-payload.valid.json"
    ))
}

/// Analysis pass over [`fixture_raw`].
#[allow(dead_code)]
pub fn fixture_view() -> AnalysisView {
    analyze_payload(fixture_raw()).expect("fixture payload should analyze")
}
