//! Status Summary Report
//!
//! Command-line front-end for the classification and query engine: loads a
//! report CSV, applies a date window and site selection, and prints the
//! status-count summary plus the flagged-rows table — the same data the
//! dashboard's bar/pie charts and table render.
//!
//! Usage:
//!   cargo run --bin summarize_report -- --start 2024-01-01 --end 2024-01-31
//!
//! Options:
//!   --csv PATH       Report CSV (defaults to the configured report)
//!   --start WHEN     Window start, inclusive (date or date-time; defaults
//!                    to the earliest reading)
//!   --end WHEN       Window end, inclusive (defaults to the latest reading)
//!   --sites a,b      Comma-separated site ids (default: all sites)
//!
//! Environment:
//!   SOLMON_CONFIG - alternate path to solmon.toml

use solmon_service::config::load_config;
use solmon_service::ingest::report::{load_report_file, parse_timestamp};
use solmon_service::model::Status;
use solmon_service::query::{FilterCriteria, SiteSelection, run_query};
use std::env;

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() {
    println!("📊 Status Summary Report");
    println!("========================\n");

    let args: Vec<String> = env::args().collect();

    let report_path = arg_value(&args, "--csv").unwrap_or_else(|| load_config().report_csv);

    println!("📄 Loading report {}...", report_path);
    let load = match load_report_file(&report_path) {
        Ok(load) => load,
        Err(e) => {
            eprintln!("\n❌ Failed to load report: {}\n", e);
            std::process::exit(1);
        }
    };
    if !load.skipped.is_empty() {
        println!("⚠ Excluded {} malformed row(s)", load.skipped.len());
    }
    let dataset = load.dataset;
    println!("✓ Loaded {} readings\n", dataset.len());

    // Window bounds default to the report's full span, the way the
    // dashboard date inputs do.
    let span = dataset.date_span();
    let parse_bound = |flag: &str| {
        arg_value(&args, flag).map(|raw| {
            parse_timestamp(&raw).unwrap_or_else(|| {
                eprintln!("Error: unparseable {} value '{}'", flag, raw);
                std::process::exit(1);
            })
        })
    };
    let start = parse_bound("--start").or_else(|| span.map(|(first, _)| first));
    let end = parse_bound("--end").or_else(|| span.map(|(_, last)| last));

    let (Some(start), Some(end)) = (start, end) else {
        println!("ℹ️  Report is empty — nothing to summarize.");
        return;
    };

    let sites = match arg_value(&args, "--sites") {
        None => SiteSelection::All,
        Some(list) => SiteSelection::from_picks(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        ),
    };

    let criteria = FilterCriteria { start, end, sites };
    let result = run_query(&dataset, &criteria);
    let total: usize = result.counts.values().sum();

    println!("Window: {} → {}", criteria.start, criteria.end);
    println!("Rows in window: {}\n", total);

    println!("Status counts:");
    for status in Status::all() {
        let count = result.counts.get(&status).copied().unwrap_or(0);
        let pct = if total > 0 {
            100.0 * count as f64 / total as f64
        } else {
            0.0
        };
        println!("   {:<16} {:>5}  ({:.1}%)", status.label(), count, pct);
    }

    if result.flagged.is_empty() {
        println!("\n✓ No flagged readings in this window.");
        return;
    }

    println!("\nFlagged readings ({}):", result.flagged.len());
    println!(
        "   {:<19}  {:<10}  {:>10}  {:>12}  {:>6}  {}",
        "timestamp", "site", "energy kWh", "expected kWh", "PR %", "status"
    );
    for reading in &result.flagged {
        println!(
            "   {:<19}  {:<10}  {:>10.1}  {:>12.1}  {:>6.1}  {}",
            reading.timestamp.to_string(),
            reading.site_id,
            reading.energy_kwh,
            reading.expected_kwh,
            reading.performance_ratio_pct,
            reading.status
        );
    }
}
