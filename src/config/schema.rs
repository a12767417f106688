//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tool.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration shared by the CLI and the upload portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Ledger node connection settings.
    pub ledger: LedgerConfig,

    /// Where the retrieved table is written.
    pub output: OutputConfig,

    /// Upload portal settings (ignored by the CLI).
    pub portal: PortalConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger node connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Base API URL of the node (e.g., "http://localhost:9984/api/v1/").
    pub api_url: String,

    /// Upper bound for a single submit or fetch call, in seconds.
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:9984/api/v1/".to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 5,
        }
    }
}

/// Output location for the retrieved table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File the retrieved rows are written to. The parent directory must exist.
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("retrieved/retrieved_transactions.csv"),
        }
    }
}

/// Upload portal configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Directory uploaded files are stored in.
    pub upload_dir: PathBuf,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,

    /// External dashboard that `/dashboard` redirects to.
    pub dashboard_url: Option<String>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 10 * 1024 * 1024, // 10MB
            dashboard_url: Some("http://localhost:8050".to_string()),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record pipeline metrics and expose them on the portal.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ledger.api_url, "http://localhost:9984/api/v1/");
        assert_eq!(
            config.output.path,
            PathBuf::from("retrieved/retrieved_transactions.csv")
        );
        assert_eq!(config.portal.bind_address, "127.0.0.1:5000");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [ledger]
            api_url = "http://ledger.internal:9984/api/v1/"

            [portal]
            upload_dir = "/var/lib/uploads"
            "#,
        )
        .unwrap();

        assert_eq!(config.ledger.api_url, "http://ledger.internal:9984/api/v1/");
        assert_eq!(config.ledger.request_timeout_secs, 60);
        assert_eq!(config.portal.upload_dir, PathBuf::from("/var/lib/uploads"));
        assert_eq!(config.portal.max_upload_bytes, 10 * 1024 * 1024);
    }
}
