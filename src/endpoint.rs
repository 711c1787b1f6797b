/// HTTP endpoint for querying the classified dataset
///
/// Provides a simple JSON API for the rendering collaborators (chart and
/// table layers, external notebooks) to run queries against the loaded
/// report. It serves data only — all plotting and layout live on the
/// client side.
///
/// Endpoints:
/// - GET /query?start=...&end=...&sites=a,b - Run filter/summarize/flagged
/// - GET /dataset - Dataset shape (row count, sites, date span)
/// - GET /health - Service health check

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ingest::report::parse_timestamp;
use crate::model::Dataset;
use crate::query::{FilterCriteria, SiteSelection, run_query};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Dataset shape summary, used by form front-ends to populate the site
/// picker and default the date inputs to the report's full span.
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub rows: usize,
    pub sites: Vec<String>,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

/// Builds the /dataset response from the loaded dataset.
pub fn describe_dataset(dataset: &Dataset) -> DatasetResponse {
    let span = dataset.date_span();
    DatasetResponse {
        rows: dataset.len(),
        sites: dataset.distinct_sites(),
        first_timestamp: span.map(|(first, _)| first),
        last_timestamp: span.map(|(_, last)| last),
    }
}

// ---------------------------------------------------------------------------
// Query-string parsing
// ---------------------------------------------------------------------------

/// Splits a raw query string into key/value pairs, percent-decoding the
/// values. Site ids and the `Select All` picker sentinel may contain
/// spaces, so `+` is normalized before decoding.
fn parse_query_params(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = value.replace('+', " ");
        let decoded = urlencoding::decode(&value)
            .map(|cow| cow.into_owned())
            .unwrap_or(value);
        params.insert(key.to_string(), decoded);
    }
    params
}

/// Builds `FilterCriteria` from the /query parameters.
///
/// `start` and `end` are required and accept the same layouts as the
/// report itself. `sites` is a comma-separated list; absent, empty, or
/// the literal `all` means no site restriction. An inverted window is NOT
/// rejected here — the query engine answers it with an empty result and
/// the form layer owns any messaging.
fn parse_criteria(params: &HashMap<String, String>) -> Result<FilterCriteria, String> {
    let bound = |name: &str| -> Result<NaiveDateTime, String> {
        let raw = params
            .get(name)
            .ok_or_else(|| format!("missing '{}' parameter", name))?;
        parse_timestamp(raw).ok_or_else(|| format!("unparseable '{}' value '{}'", name, raw))
    };
    let start = bound("start")?;
    let end = bound("end")?;

    let sites = match params.get("sites").map(String::as_str) {
        None | Some("") | Some("all") => SiteSelection::All,
        Some(list) => SiteSelection::from_picks(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        ),
    };

    Ok(FilterCriteria { start, end, sites })
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start the HTTP endpoint server on the specified port.
///
/// Requests are served sequentially on this thread: each query runs
/// filter → summarize → flagged to completion before the next request is
/// read. The dataset is shared read-only; nothing here mutates it.
pub fn start_endpoint_server(port: u16, dataset: Dataset) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET /query?start=YYYY-MM-DD&end=YYYY-MM-DD&sites=a,b - Run a query");
    println!("   GET /dataset - Dataset shape for widget defaults");
    println!("   GET /health - Service health check\n");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));

        let response = match path {
            "/health" => handle_health(),
            "/dataset" => handle_dataset(&dataset),
            "/query" => handle_query(&dataset, query),
            _ => create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": ["/health", "/dataset", "/query"]
                }),
            ),
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Handle /health endpoint
fn handle_health() -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(
        200,
        serde_json::json!({
            "status": "ok",
            "service": "solmon_service",
            "version": "0.1.0"
        }),
    )
}

/// Handle /dataset endpoint
fn handle_dataset(dataset: &Dataset) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    create_response(200, serde_json::to_value(describe_dataset(dataset)).unwrap())
}

/// Handle /query endpoint
fn handle_query(dataset: &Dataset, query: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let params = parse_query_params(query);
    match parse_criteria(&params) {
        Ok(criteria) => {
            let result = run_query(dataset, &criteria);
            create_response(200, serde_json::to_value(&result).unwrap())
        }
        Err(e) => create_response(
            400,
            serde_json::json!({
                "error": e,
                "expected": "/query?start=YYYY-MM-DD&end=YYYY-MM-DD[&sites=a,b|all]"
            }),
        ),
    }
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&json).unwrap();
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
