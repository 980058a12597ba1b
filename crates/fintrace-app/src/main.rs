#![warn(missing_docs)]
//! # fintrace-app binary
//!
//! Headless dashboard runner: reads an analysis payload and prints the
//! normalized dashboard as JSON.
//!
//! Usage:
//!   fintrace-app payload.json
//!   fintrace-app payload.json --sort totalAmount --asc --page 2
//!   fintrace-app payload.json --export-request
//!   fintrace-app payload.json --export out/

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fintrace_analysis_contract::parse_analysis_payload;
use fintrace_app::{
    analyze, api_endpoints_from_env, app_version, export_request, page_size_from_env,
    parse_sort_key, project_dashboard, write_export_document,
};
use fintrace_ui::{SortDirection, SortState, TableQuery};

/// CLI entry point.
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--version") {
        println!("fintrace-app {}", app_version());
        return Ok(());
    }

    let Some(path) = args.get(1).filter(|arg| !arg.starts_with("--")) else {
        bail!(
            "usage: fintrace-app <payload.json> [--sort <column>] [--asc] [--page <n>] \
             [--export-request] [--export <dir>]"
        );
    };

    let raw = fs::read_to_string(path).with_context(|| format!("unable to read payload '{path}'"))?;
    let payload = parse_analysis_payload(&raw)?;

    if args.iter().any(|arg| arg == "--export-request") {
        let endpoints = api_endpoints_from_env()?;
        log::info!("export request prepared for {}", endpoints.export);
        println!("{}", serde_json::to_string_pretty(&export_request(&payload))?);
        return Ok(());
    }

    if let Some(dir) = flag_value(&args, "--export") {
        let path = write_export_document(&payload, Path::new(dir))?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut query = TableQuery::new(page_size_from_env()?);
    if let Some(column) = flag_value(&args, "--sort") {
        let key = parse_sort_key(column)?;
        query.sort = SortState {
            key,
            direction: SortDirection::Descending,
        };
    }
    if args.iter().any(|arg| arg == "--asc") {
        query.sort.direction = SortDirection::Ascending;
    }

    let view = analyze(&payload);
    if let Some(page) = flag_value(&args, "--page") {
        let page: usize = page
            .parse()
            .with_context(|| format!("--page expects a number, got '{page}'"))?;
        query = query.go_to(page, view.rings.len());
    }

    let dashboard = project_dashboard(&view, query);
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|window| window[0] == flag)
        .map(|window| window[1].as_str())
}
