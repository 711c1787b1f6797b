/// Test fixtures: representative estate report CSV payloads.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the loader. They reflect the real export variants:
///
///   - timestamped variant: `Unnamed: 0.1`, `Unnamed: 0` housekeeping
///     indexes, `Date and Time`, `Location Code`, the three numeric
///     columns, plus weather columns the loader ignores.
///   - date-only variant: `Date` column, no `Location Code` at all.
///
/// Numeric values are chosen so each fixture covers every status label
/// (PR below/above the 80 % floor, energy above/equal/below expectation).

/// Full timestamped variant: two sites, four rows, one of each interesting
/// status combination (Normal, Underperforming, Anomaly, energy == expected).
pub(crate) fn fixture_timestamped_report() -> &'static str {
    "\
Unnamed: 0.1,Unnamed: 0,Date and Time,Location Code,Energy kWh,Expected Value kWh,PR %,Ambient Temp C,Irradiance Wm2
0,0,2024-01-01 08:00:00,LOC-01,41.3,45.0,91.2,12.4,310.0
1,1,2024-01-01 09:00:00,LOC-01,18.2,44.1,64.8,12.9,295.5
2,2,2024-01-01 08:00:00,LOC-02,52.7,48.0,88.1,11.8,322.0
3,3,2024-01-01 09:00:00,LOC-02,47.5,47.5,86.0,12.1,318.4
"
}

/// Date-only variant with no `Location Code` column — every row lands on
/// the fallback site id.
pub(crate) fn fixture_date_only_report() -> &'static str {
    "\
Unnamed: 0,Date,Energy kWh,Expected Value kWh,PR %
0,2024-02-01,310.0,340.0,87.5
1,2024-02-02,205.4,338.0,61.1
2,2024-02-03,355.9,341.0,92.3
"
}

/// Timestamped variant with three broken rows: an unparseable timestamp,
/// a non-numeric PR value, and an empty location code. The two clean rows
/// must survive.
pub(crate) fn fixture_malformed_rows() -> &'static str {
    "\
Date and Time,Location Code,Energy kWh,Expected Value kWh,PR %
2024-01-01 08:00:00,LOC-01,41.3,45.0,91.2
not-a-date,LOC-01,18.2,44.1,64.8
2024-01-01 10:00:00,LOC-02,52.7,48.0,88.1
2024-01-01 11:00:00,LOC-02,47.5,47.5,n/a
2024-01-01 12:00:00,,33.0,40.0,82.5
"
}

/// Header missing the required `Energy kWh` column — the whole load fails.
pub(crate) fn fixture_missing_energy_column() -> &'static str {
    "\
Date and Time,Location Code,Expected Value kWh,PR %
2024-01-01 08:00:00,LOC-01,45.0,91.2
"
}
