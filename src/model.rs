/// Core data types for the solar performance monitoring service.
///
/// This module defines the shared domain model imported by all other
/// modules. It contains no I/O — only types, the status vocabulary, and
/// the report column-name constants.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Report column names
// ---------------------------------------------------------------------------

/// Timestamp column in the date-only report variant.
pub const COL_DATE: &str = "Date";

/// Timestamp column in the timestamped report variants. Preferred over
/// [`COL_DATE`] when an export carries both.
pub const COL_DATE_TIME: &str = "Date and Time";

/// Site identifier column. Only two of the known export variants carry it;
/// when absent, rows are assigned [`FALLBACK_SITE_ID`].
pub const COL_LOCATION: &str = "Location Code";

/// Measured energy output column, in kWh.
pub const COL_ENERGY: &str = "Energy kWh";

/// Modeled/expected energy output column, in kWh.
pub const COL_EXPECTED: &str = "Expected Value kWh";

/// Performance ratio column, in percent.
pub const COL_PR: &str = "PR %";

/// Export-index columns the report generator carries along; ignored by the
/// loader, as is any other unrecognized column.
pub const HOUSEKEEPING_COLUMNS: &[&str] = &["Unnamed: 0", "Unnamed: 0.1"];

/// Site id assigned to every row of a report that has no `Location Code`
/// column.
pub const FALLBACK_SITE_ID: &str = "estate";

/// Sentinel site-picker entry meaning "every site in the dataset".
pub const SELECT_ALL: &str = "Select All";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Performance status of a single reading, assigned once at load time by
/// `classify::classify` and never recomputed per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Performance ratio below the 80 % floor, regardless of the
    /// energy-vs-expected comparison.
    Underperforming,
    /// Measured energy exceeds the modeled expectation despite an
    /// acceptable performance ratio.
    AnomalyReading,
    Normal,
}

impl Status {
    /// Human-readable label, matching the vocabulary used by the report
    /// dashboards (`"Anomaly Reading"` contains a space).
    pub fn label(&self) -> &'static str {
        match self {
            Status::Underperforming => "Underperforming",
            Status::AnomalyReading => "Anomaly Reading",
            Status::Normal => "Normal",
        }
    }

    /// All statuses, in the order dashboards list them.
    pub fn all() -> [Status; 3] {
        [Status::Underperforming, Status::AnomalyReading, Status::Normal]
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Serialized as the display label so status-keyed count maps become plain
// JSON objects.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Reading and Dataset
// ---------------------------------------------------------------------------

/// One sensor/report record from the estate export, with its derived status
/// attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub site_id: String,
    pub energy_kwh: f64,
    pub expected_kwh: f64,
    pub performance_ratio_pct: f64,
    pub status: Status,
}

/// The ordered collection of readings loaded from one report.
///
/// Loaded once at process start and never mutated afterwards — queries
/// borrow it read-only and produce fresh result values.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// All readings in original report order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Distinct site ids present in the dataset, sorted. Form front-ends
    /// use this to populate site pickers.
    pub fn distinct_sites(&self) -> Vec<String> {
        self.readings
            .iter()
            .map(|r| r.site_id.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest timestamps in the dataset, or `None` when empty.
    /// Form front-ends use this for default date-input values.
    pub fn date_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.iter().map(|r| r.timestamp).min()?;
        let last = self.readings.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when loading a report CSV.
///
/// Row-level problems are not errors at this level: malformed rows are
/// excluded from the dataset and surfaced as `ingest::report::SkippedRow`
/// records instead.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// The report file could not be opened or read.
    Io(String),
    /// The CSV structure itself was unreadable (bad header row, etc).
    Csv(String),
    /// A required column is missing from the header row.
    MissingColumn(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(msg) => write!(f, "I/O error: {}", msg),
            IngestError::Csv(msg) => write!(f, "CSV error: {}", msg),
            IngestError::MissingColumn(name) => {
                write!(f, "Required column not found in report header: {}", name)
            }
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
