/// Estate report CSV ingestion: header resolution + row parsing.
///
/// The report generator exports a handful of near-identical CSV layouts.
/// All of them carry the energy/expected/PR columns; they differ in whether
/// the timestamp column is named `Date` or `Date and Time`, and whether a
/// `Location Code` column exists at all. Columns are therefore resolved by
/// header name, never by position, and unrecognized columns (including the
/// `Unnamed: *` export indexes) are ignored. See `fixtures.rs` for
/// representative payloads.
///
/// Error policy: a missing required column fails the whole load; a
/// malformed row is excluded from the dataset and reported as a
/// `SkippedRow` so the operator sees it once at startup. A bad row is
/// never given a default status.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;

use crate::classify::classify;
use crate::model::{
    COL_DATE, COL_DATE_TIME, COL_ENERGY, COL_EXPECTED, COL_LOCATION, COL_PR, Dataset,
    FALLBACK_SITE_ID, IngestError, Reading,
};

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Accepted timestamp layouts, tried in order. Date-only values parse to
/// midnight.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a report timestamp string. Front-ends reuse this for
/// user-supplied window bounds so both sides accept the same layouts.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the recognized columns within one export's header row.
#[derive(Debug, Clone, PartialEq)]
struct ColumnLayout {
    timestamp: usize,
    /// `None` for the export variant without a `Location Code` column.
    location: Option<usize>,
    energy: usize,
    expected: usize,
    pr: usize,
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnLayout, IngestError> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    // Prefer the timestamped variant when an export carries both columns.
    let timestamp = position(COL_DATE_TIME)
        .or_else(|| position(COL_DATE))
        .ok_or_else(|| {
            IngestError::MissingColumn(format!("{} (or {})", COL_DATE_TIME, COL_DATE))
        })?;

    let required = |name: &'static str| {
        position(name).ok_or_else(|| IngestError::MissingColumn(name.to_string()))
    };

    Ok(ColumnLayout {
        timestamp,
        location: position(COL_LOCATION),
        energy: required(COL_ENERGY)?,
        expected: required(COL_EXPECTED)?,
        pr: required(COL_PR)?,
    })
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// One excluded source row, reported to the operator at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source file; the header row is line 1.
    pub line: u64,
    pub reason: String,
}

fn parse_record(
    record: &StringRecord,
    layout: &ColumnLayout,
    line: u64,
) -> Result<Reading, SkippedRow> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let ts_raw = field(layout.timestamp);
    let timestamp = parse_timestamp(ts_raw).ok_or_else(|| SkippedRow {
        line,
        reason: format!("unparseable timestamp '{}'", ts_raw),
    })?;

    let site_id = match layout.location {
        Some(idx) => {
            let raw = field(idx);
            if raw.is_empty() {
                return Err(SkippedRow {
                    line,
                    reason: format!("empty {}", COL_LOCATION),
                });
            }
            raw.to_string()
        }
        None => FALLBACK_SITE_ID.to_string(),
    };

    let numeric = |idx: usize, name: &str| {
        let raw = field(idx);
        raw.parse::<f64>().map_err(|_| SkippedRow {
            line,
            reason: format!("invalid {} '{}'", name, raw),
        })
    };

    let energy_kwh = numeric(layout.energy, COL_ENERGY)?;
    let expected_kwh = numeric(layout.expected, COL_EXPECTED)?;
    let performance_ratio_pct = numeric(layout.pr, COL_PR)?;

    Ok(Reading {
        timestamp,
        site_id,
        energy_kwh,
        expected_kwh,
        performance_ratio_pct,
        status: classify(performance_ratio_pct, energy_kwh, expected_kwh),
    })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Everything one load produces: the classified dataset plus the rows that
/// were excluded and why.
#[derive(Debug)]
pub struct ReportLoad {
    pub dataset: Dataset,
    pub skipped: Vec<SkippedRow>,
}

/// Loads a report from any reader. Every surviving row is classified here,
/// once — queries never recompute status.
///
/// # Errors
/// - `IngestError::Csv` — the header row was unreadable.
/// - `IngestError::MissingColumn` — a required column is absent.
pub fn load_report<R: Read>(reader: R) -> Result<ReportLoad, IngestError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| IngestError::Csv(format!("failed to read report header: {}", e)))?
        .clone();
    let layout = resolve_columns(&headers)?;

    let mut readings = Vec::new();
    let mut skipped = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        // The header occupies line 1; data rows start at line 2.
        let line = i as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                skipped.push(SkippedRow {
                    line,
                    reason: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        match parse_record(&record, &layout, line) {
            Ok(reading) => readings.push(reading),
            Err(row) => skipped.push(row),
        }
    }

    Ok(ReportLoad {
        dataset: Dataset::new(readings),
        skipped,
    })
}

/// Opens and loads a report CSV from disk.
pub fn load_report_file<P: AsRef<Path>>(path: P) -> Result<ReportLoad, IngestError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| IngestError::Io(format!("failed to open {}: {}", path.display(), e)))?;
    load_report(file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::Status;

    // --- Timestamp parsing ----------------------------------------------------

    #[test]
    fn test_parse_timestamp_accepts_all_report_layouts() {
        for raw in [
            "2024-01-01 13:45:00",
            "2024-01-01T13:45:00",
            "2024-01-01 13:45",
        ] {
            let ts = parse_timestamp(raw).expect("layout should parse");
            assert_eq!(ts.date().to_string(), "2024-01-01");
        }
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let ts = parse_timestamp("2024-03-15").expect("date-only should parse");
        assert_eq!(ts.to_string(), "2024-03-15 00:00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    // --- Header resolution ----------------------------------------------------

    #[test]
    fn test_timestamped_variant_resolves_all_columns() {
        let load = load_report(fixture_timestamped_report().as_bytes())
            .expect("fixture should load");
        assert_eq!(load.dataset.len(), 4);
        assert!(load.skipped.is_empty());
    }

    #[test]
    fn test_date_only_variant_without_location_uses_fallback_site() {
        let load = load_report(fixture_date_only_report().as_bytes())
            .expect("fixture should load");
        assert_eq!(load.dataset.len(), 3);
        assert!(
            load.dataset
                .readings()
                .iter()
                .all(|r| r.site_id == FALLBACK_SITE_ID),
            "a report without Location Code gets the fallback site id"
        );
        assert_eq!(load.dataset.distinct_sites(), vec![FALLBACK_SITE_ID]);
    }

    #[test]
    fn test_missing_energy_column_fails_the_load() {
        let err = load_report(fixture_missing_energy_column().as_bytes())
            .expect_err("load must fail without Energy kWh");
        assert_eq!(err, IngestError::MissingColumn(COL_ENERGY.to_string()));
    }

    #[test]
    fn test_missing_timestamp_column_fails_the_load() {
        let csv = "Location Code,Energy kWh,Expected Value kWh,PR %\nLOC-01,10,8,90\n";
        let err = load_report(csv.as_bytes()).expect_err("load must fail without a date column");
        assert!(matches!(err, IngestError::MissingColumn(_)));
    }

    #[test]
    fn test_housekeeping_and_weather_columns_are_ignored() {
        // The timestamped fixture carries the export-index columns and two
        // weather columns; none of them affect parsing.
        let header = fixture_timestamped_report().lines().next().unwrap();
        for name in crate::model::HOUSEKEEPING_COLUMNS {
            assert!(header.contains(name), "fixture should carry {}", name);
        }

        let load = load_report(fixture_timestamped_report().as_bytes())
            .expect("fixture should load");
        let first = &load.dataset.readings()[0];
        assert_eq!(first.site_id, "LOC-01");
        assert!((first.energy_kwh - 41.3).abs() < 1e-9);
    }

    #[test]
    fn test_date_and_time_preferred_when_both_columns_present() {
        let csv = "\
Date,Date and Time,Location Code,Energy kWh,Expected Value kWh,PR %
2024-01-01,2024-01-01 13:45:00,LOC-01,41.3,45.0,91.2
";
        let load = load_report(csv.as_bytes()).expect("report should load");
        assert_eq!(
            load.dataset.readings()[0].timestamp.to_string(),
            "2024-01-01 13:45:00",
            "the timestamped column wins over the date-only one"
        );
    }

    // --- Classification at load time ------------------------------------------

    #[test]
    fn test_statuses_are_attached_during_load() {
        let load = load_report(fixture_timestamped_report().as_bytes())
            .expect("fixture should load");
        let statuses: Vec<Status> = load.dataset.readings().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                Status::Normal,          // PR 91.2, energy below expected
                Status::Underperforming, // PR 64.8
                Status::AnomalyReading,  // PR 88.1, energy above expected
                Status::Normal,          // PR 86.0, energy equal to expected
            ]
        );
    }

    // --- Malformed rows --------------------------------------------------------

    #[test]
    fn test_malformed_rows_are_excluded_and_reported() {
        let load = load_report(fixture_malformed_rows().as_bytes())
            .expect("structurally valid report should load");

        assert_eq!(load.dataset.len(), 2, "only the well-formed rows survive");
        assert_eq!(load.skipped.len(), 3);

        // Line numbers count from the header at line 1.
        let lines: Vec<u64> = load.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 5, 6]);

        assert!(load.skipped[0].reason.contains("timestamp"));
        assert!(load.skipped[1].reason.contains("PR %"));
        assert!(load.skipped[2].reason.contains("Location Code"));
    }

    #[test]
    fn test_bad_rows_never_default_to_normal() {
        let load = load_report(fixture_malformed_rows().as_bytes())
            .expect("structurally valid report should load");
        // The skipped rows must not appear in the dataset under any label.
        assert!(
            load.dataset
                .readings()
                .iter()
                .all(|r| r.performance_ratio_pct.is_finite()),
        );
        assert_eq!(load.dataset.len() + load.skipped.len(), 5);
    }

    #[test]
    fn test_empty_report_is_valid() {
        let csv = "Date and Time,Location Code,Energy kWh,Expected Value kWh,PR %\n";
        let load = load_report(csv.as_bytes()).expect("header-only report should load");
        assert!(load.dataset.is_empty());
        assert!(load.skipped.is_empty());
    }
}
