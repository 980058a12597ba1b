#![warn(missing_docs)]
//! # fintrace-app
//!
//! ## Purpose
//! Composes ring normalization, summary derivation and graph construction
//! into one dashboard pipeline for `fintrace`.
//!
//! ## Responsibilities
//! - Run the three pure stages over one payload ([`analyze`],
//!   [`analyze_payload`]).
//! - Project the result into a display-ready [`DashboardView`].
//! - Read collaborator configuration (endpoints, table page size) from the
//!   environment.
//! - Build the export request body handed to the export collaborator and
//!   write the export document to disk.
//!
//! ## Data flow
//! Raw JSON -> [`analyze_payload`] -> [`AnalysisView`] ->
//! [`project_dashboard`] -> [`DashboardView`] rendered or printed.
//!
//! ## Ownership and lifetimes
//! Every stage returns freshly allocated owned output; the payload is only
//! borrowed, so stages can be rerun (for example on each sort change) without
//! coordination.
//!
//! ## Error model
//! Decode, configuration, endpoint and file-write failures are wrapped in
//! [`AppError`]. Data-shape
//! problems inside a decoded payload never fail.

use std::fs;
use std::path::{Path, PathBuf};

use fintrace_analysis_contract::{
    AnalysisContractError, AnalysisPayload, SummaryMetric, derive_summary_with_rings,
    normalize_rings, parse_analysis_payload,
};
use fintrace_core::NormalizedRing;
use fintrace_graph::{TransactionGraph, build_graph};
use fintrace_ui::{DEFAULT_PAGE_SIZE, MetricCard, RingDetail, RingRow, SortKey, TableQuery};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("FINTRACE_VERSION");

/// File name suggested for exported detection output.
pub const EXPORT_FILE_NAME: &str = "fintrace_rift_output.json";

/// Backend base URL used when `FINTRACE_API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Upload path used when `FINTRACE_UPLOAD_ENDPOINT` is unset.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "/upload";

/// Export path used when `FINTRACE_EXPORT_ENDPOINT` is unset.
pub const DEFAULT_EXPORT_ENDPOINT: &str = "/export-rift";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Canonical output of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    /// Normalized rings in source order.
    pub rings: Vec<NormalizedRing>,
    /// Seven summary counters in display order.
    pub summary: Vec<SummaryMetric>,
    /// Account/transaction graph.
    pub graph: TransactionGraph,
}

/// Runs normalization, summary derivation and graph construction.
pub fn analyze(payload: &AnalysisPayload) -> AnalysisView {
    let rings = normalize_rings(payload.fraud_rings());
    let summary = derive_summary_with_rings(payload, &rings);
    let graph = build_graph(payload.transactions().unwrap_or_default());

    log::info!(
        "analysis normalized rings={} graph_nodes={} graph_links={}",
        rings.len(),
        graph.nodes.len(),
        graph.links.len()
    );

    AnalysisView {
        rings,
        summary,
        graph,
    }
}

/// Decodes raw JSON and runs [`analyze`].
///
/// # Errors
/// Returns [`AppError::Analysis`] when `raw` is not valid JSON.
pub fn analyze_payload(raw: &str) -> Result<AnalysisView, AppError> {
    let payload = parse_analysis_payload(raw)?;
    Ok(analyze(&payload))
}

/// Ring table section of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingTableView {
    /// Query the rows were produced with, page already clamped.
    pub query: TableQuery,
    /// Total page count.
    pub page_count: usize,
    /// Rows on the current page.
    pub rows: Vec<RingRow>,
    /// Expanded detail per row, same order as `rows`.
    pub details: Vec<RingDetail>,
}

/// Display-ready dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Application version.
    pub version: String,
    /// Summary cards in display order.
    pub summary: Vec<MetricCard>,
    /// Ring table page.
    pub table: RingTableView,
    /// Network graph; empty when there is nothing to draw.
    pub graph: TransactionGraph,
}

/// Projects an analysis pass into a dashboard for `query`.
pub fn project_dashboard(view: &AnalysisView, query: TableQuery) -> DashboardView {
    let page = query.apply(&view.rings);

    DashboardView {
        version: app_version().to_string(),
        summary: view.summary.iter().map(MetricCard::from).collect(),
        table: RingTableView {
            query: TableQuery {
                page: page.clamped_page_number,
                ..query
            },
            page_count: page.page_count,
            rows: page.page.iter().map(RingRow::from).collect(),
            details: page.page.iter().map(RingDetail::from).collect(),
        },
        graph: view.graph.clone(),
    }
}

/// Builds the body posted to the export collaborator.
pub fn export_request(payload: &AnalysisPayload) -> Value {
    json!({ "detection_result": Value::Object(payload.as_map().clone()) })
}

/// Renders the analysis as the pretty-printed export document.
///
/// # Errors
/// Returns [`AppError::Encode`] when JSON serialization fails.
pub fn export_document(payload: &AnalysisPayload) -> Result<Vec<u8>, AppError> {
    serde_json::to_vec_pretty(payload.as_map()).map_err(AppError::Encode)
}

/// Writes the export document into `dir` as [`EXPORT_FILE_NAME`] and returns
/// the written path. An existing file is replaced.
///
/// # Errors
/// Returns [`AppError::Encode`] when serialization fails and [`AppError::Io`]
/// when the file cannot be written.
pub fn write_export_document(payload: &AnalysisPayload, dir: &Path) -> Result<PathBuf, AppError> {
    let document = export_document(payload)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, document)?;
    log::info!("export document written to {}", path.display());
    Ok(path)
}

/// Parses a ring table column name given on the command line.
///
/// # Errors
/// Returns [`AppError::Config`] for an unknown column.
pub fn parse_sort_key(column: &str) -> Result<SortKey, AppError> {
    SortKey::from_column(column)
        .ok_or_else(|| AppError::Config(format!("unknown sort column '{column}'")))
}

/// Absolute collaborator endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Transaction upload endpoint.
    pub upload: Url,
    /// Detection export endpoint.
    pub export: Url,
}

impl ApiEndpoints {
    /// Resolves upload and export paths against `base_url`.
    ///
    /// # Errors
    /// Returns [`AppError::Endpoint`] when the base or a path is not a valid
    /// URL reference.
    pub fn resolve(base_url: &str, upload: &str, export: &str) -> Result<Self, AppError> {
        let base = Url::parse(base_url.trim())?;
        Ok(Self {
            upload: base.join(upload.trim())?,
            export: base.join(export.trim())?,
        })
    }
}

/// Reads collaborator endpoints from the environment.
///
/// - `FINTRACE_API_BASE_URL` (default [`DEFAULT_API_BASE_URL`])
/// - `FINTRACE_UPLOAD_ENDPOINT` (default [`DEFAULT_UPLOAD_ENDPOINT`])
/// - `FINTRACE_EXPORT_ENDPOINT` (default [`DEFAULT_EXPORT_ENDPOINT`])
///
/// # Errors
/// Returns [`AppError::Endpoint`] when the configured values do not resolve.
pub fn api_endpoints_from_env() -> Result<ApiEndpoints, AppError> {
    let base = env_or("FINTRACE_API_BASE_URL", DEFAULT_API_BASE_URL);
    let upload = env_or("FINTRACE_UPLOAD_ENDPOINT", DEFAULT_UPLOAD_ENDPOINT);
    let export = env_or("FINTRACE_EXPORT_ENDPOINT", DEFAULT_EXPORT_ENDPOINT);
    ApiEndpoints::resolve(&base, &upload, &export)
}

/// Reads the ring table page size from `FINTRACE_PAGE_SIZE`.
///
/// Unset or blank => [`DEFAULT_PAGE_SIZE`].
///
/// # Errors
/// Returns [`AppError::Config`] unless the value is a positive integer.
pub fn page_size_from_env() -> Result<usize, AppError> {
    let raw = env_or("FINTRACE_PAGE_SIZE", "");
    if raw.trim().is_empty() {
        return Ok(DEFAULT_PAGE_SIZE);
    }

    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(AppError::Config(format!(
            "FINTRACE_PAGE_SIZE must be a positive integer, got '{raw}'"
        ))),
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Payload decode error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisContractError),
    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),
    /// Endpoint URL could not be resolved.
    #[error("endpoint error: {0}")]
    Endpoint(#[from] url::ParseError),
    /// Output serialization error.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),
    /// Export file could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
