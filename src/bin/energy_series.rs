//! Energy-Over-Time Series Export
//!
//! Command-line front-end that emits the line-chart data: the filtered
//! readings in report order as tab-separated values, one row per reading,
//! keyed by status so a plotting tool can draw one series per label.
//!
//! Data goes to stdout; operator chatter goes to stderr, so the output can
//! be piped straight into a plotting script.
//!
//! Usage:
//!   cargo run --bin energy_series -- --start 2024-01-01 --end 2024-01-31 > series.tsv
//!
//! Options:
//!   --csv PATH       Report CSV (defaults to the configured report)
//!   --start WHEN     Window start, inclusive (defaults to the earliest reading)
//!   --end WHEN       Window end, inclusive (defaults to the latest reading)
//!   --sites a,b      Comma-separated site ids (default: all sites)
//!
//! Environment:
//!   SOLMON_CONFIG - alternate path to solmon.toml

use solmon_service::config::load_config;
use solmon_service::ingest::report::{load_report_file, parse_timestamp};
use solmon_service::query::{FilterCriteria, SiteSelection, filter};
use std::env;

fn arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let report_path = arg_value(&args, "--csv").unwrap_or_else(|| load_config().report_csv);

    let load = match load_report_file(&report_path) {
        Ok(load) => load,
        Err(e) => {
            eprintln!("❌ Failed to load report: {}", e);
            std::process::exit(1);
        }
    };
    if !load.skipped.is_empty() {
        eprintln!("⚠ Excluded {} malformed row(s)", load.skipped.len());
    }
    let dataset = load.dataset;

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
        eprintln!("ℹ️  Report is empty — nothing to export.");
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

    let filtered = filter(&dataset, &FilterCriteria { start, end, sites });
    eprintln!("✓ {} readings in window", filtered.len());

    println!("timestamp\tsite\tstatus\tenergy_kwh");
    for reading in &filtered {
        println!(
            "{}\t{}\t{}\t{}",
            reading.timestamp, reading.site_id, reading.status, reading.energy_kwh
        );
    }
}
