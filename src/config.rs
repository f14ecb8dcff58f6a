use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "FRAUD_LENS_CONFIG";
/// Environment variable overriding the predictions path.
pub const PREDICTIONS_ENV: &str = "FRAUD_LENS_PREDICTIONS";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field has a default so a config file may set
/// any subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub predictions_path: PathBuf,
    /// Short model name for the metrics row.
    pub model_name: String,
    /// Headline model metric shown under the model name.
    pub model_metric: String,
    pub window_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            predictions_path: PathBuf::from("predictions.csv"),
            model_name: "GBT".to_string(),
            model_metric: "AUC-PR: 0.304".to_string(),
            window_title: "Fraud Lens – Fraud Detection Dashboard".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the JSON file named by `FRAUD_LENS_CONFIG`, then
    /// `FRAUD_LENS_PREDICTIONS`, then the CLI path argument.
    pub fn resolve(cli_path: Option<PathBuf>) -> Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(file) => Self::from_file(Path::new(&file))?,
            None => Self::default(),
        };
        if let Some(path) = std::env::var_os(PREDICTIONS_ENV) {
            cfg.predictions_path = PathBuf::from(path);
        }
        if let Some(path) = cli_path {
            cfg.predictions_path = path;
        }
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{"predictions_path": "out/preds.parquet"}"#)
            .unwrap();
        assert_eq!(cfg.predictions_path, PathBuf::from("out/preds.parquet"));
        assert_eq!(cfg.model_name, "GBT");
        assert_eq!(cfg.model_metric, "AUC-PR: 0.304");
    }

    #[test]
    fn unreadable_config_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(DashboardConfig::from_json("{ nope").is_err());
    }
}
