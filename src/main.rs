//! Solar Performance Dashboard Service - Main Entry Point
//!
//! Loads the estate report CSV once at startup:
//! 1. Parses and validates every row, excluding and reporting bad ones
//! 2. Classifies each surviving reading (underperformance / anomaly / normal)
//! 3. Prints a whole-dataset status summary
//! 4. Optionally serves the JSON query endpoint for chart/table front-ends
//!
//! Chart rendering, widget layout, and styling are handled by external
//! front-ends that consume the endpoint's JSON.
//!
//! Usage:
//!   cargo run --release                      # Load report, print summary
//!   cargo run --release -- --endpoint 8080   # Also serve the query API
//!   cargo run --release -- --csv other.csv   # Override the configured report
//!
//! Environment:
//!   SOLMON_CONFIG - alternate path to solmon.toml

use solmon_service::config::load_config;
use solmon_service::endpoint;
use solmon_service::ingest::report::load_report_file;
use solmon_service::model::Status;
use solmon_service::query::summarize;
use std::env;

fn main() {
    println!("☀️  Solar Performance Dashboard Service");
    println!("=======================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut csv_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                if i + 1 < args.len() {
                    endpoint_port = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --endpoint requires a port number");
                    std::process::exit(1);
                }
            }
            "--csv" => {
                if i + 1 < args.len() {
                    csv_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --csv requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--endpoint PORT] [--csv PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load configuration; CLI flags win over the file
    let config = load_config();
    let report_path = csv_override.unwrap_or_else(|| config.report_csv.clone());
    let port = endpoint_port.or(config.endpoint_port);

    // Load and classify the report
    println!("📄 Loading report {}...", report_path);
    let load = match load_report_file(&report_path) {
        Ok(load) => load,
        Err(e) => {
            eprintln!("\n❌ Failed to load report: {}\n", e);
            std::process::exit(1);
        }
    };

    if !load.skipped.is_empty() {
        println!("⚠ Excluded {} malformed row(s):", load.skipped.len());
        for row in &load.skipped {
            println!("   line {} - {}", row.line, row.reason);
        }
    }

    let dataset = load.dataset;
    println!("✓ Loaded {} readings", dataset.len());

    if let Some((first, last)) = dataset.date_span() {
        println!("   Date span: {} → {}", first, last);
    }
    let sites = dataset.distinct_sites();
    println!("   Sites: {}\n", sites.join(", "));

    // Whole-dataset status summary
    let counts = summarize(dataset.readings());
    println!("📊 Status summary:");
    for status in Status::all() {
        let count = counts.get(&status).copied().unwrap_or(0);
        println!("   {:<16} {}", status.label(), count);
    }
    println!();

    // Serve the query endpoint if requested
    if let Some(port) = port {
        println!("🚀 Starting query endpoint...");
        if let Err(e) = endpoint::start_endpoint_server(port, dataset) {
            eprintln!("\n❌ Endpoint server error: {}\n", e);
            std::process::exit(1);
        }
    }
}
