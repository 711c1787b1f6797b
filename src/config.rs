/// Dashboard configuration loader - parses solmon.toml
///
/// Separates deployment details from code, making it easy to point the
/// service at a different report export or move the query endpoint to
/// another port without recompiling.

use serde::Deserialize;
use std::fs;

/// Service configuration loaded from the solmon.toml configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Path to the estate report CSV loaded at startup.
    pub report_csv: String,

    /// Port for the JSON query endpoint. Absent means CLI-only operation
    /// unless `--endpoint` is passed on the command line.
    pub endpoint_port: Option<u16>,
}

/// Loads service configuration from solmon.toml.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the service cannot operate without
/// knowing which report to load.
///
/// # File Location
/// Reads the path from the `SOLMON_CONFIG` environment variable,
/// defaulting to `solmon.toml` in the current working directory (project
/// root when running via `cargo run`).
pub fn load_config() -> DashboardConfig {
    let config_path =
        std::env::var("SOLMON_CONFIG").unwrap_or_else(|_| "solmon.toml".to_string());

    let contents = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_succeeds() {
        let config = load_config();
        assert!(!config.report_csv.is_empty(), "report_csv must not be empty");
    }

    #[test]
    fn test_repo_config_serves_the_estate_report() {
        let config = load_config();
        assert!(config.report_csv.ends_with(".csv"));
        assert_eq!(config.endpoint_port, Some(8080));
    }

    #[test]
    fn test_endpoint_port_is_optional() {
        let config: DashboardConfig =
            toml::from_str("report_csv = \"readings.csv\"").expect("minimal config should parse");
        assert_eq!(config.report_csv, "readings.csv");
        assert!(config.endpoint_port.is_none());
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        let result = toml::from_str::<DashboardConfig>("endpoint_port = 8080");
        assert!(result.is_err(), "report_csv is required");
    }
}
