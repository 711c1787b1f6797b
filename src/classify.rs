//! Performance status classification.
//!
//! The loader labels each reading exactly once by comparing its performance
//! ratio against the fixed 80 % floor and its measured energy against the
//! modeled expectation. Queries only ever read the stored label — nothing
//! downstream recomputes it.

use crate::model::Status;

/// Performance-ratio floor, in percent. Readings strictly below this are
/// underperforming regardless of the energy comparison.
pub const UNDERPERFORMANCE_THRESHOLD_PCT: f64 = 80.0;

/// Classifies one reading's numeric fields into a status label.
///
/// The checks are ordered: a sub-threshold performance ratio wins over the
/// energy-vs-expected comparison, so a reading is never reported as an
/// anomaly while its ratio is below the floor. Both comparisons are strict —
/// a ratio of exactly 80 % and energy exactly equal to the expectation are
/// both `Normal`.
pub fn classify(performance_ratio_pct: f64, energy_kwh: f64, expected_kwh: f64) -> Status {
    if performance_ratio_pct < UNDERPERFORMANCE_THRESHOLD_PCT {
        Status::Underperforming
    } else if energy_kwh > expected_kwh {
        Status::AnomalyReading
    } else {
        Status::Normal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
