//! # Overhead Configuration
//!
//! Shop-wide rates applied to every piece: electricity, labor, profit margin
//! and wear. Exported and imported as a flat JSON object:
//!
//! ```json
//! {
//!   "electricityRate": 2.8,
//!   "laborRate": 28.0,
//!   "profitMarginPercent": 18.0,
//!   "machineWearRate": 12.0,
//!   "spoolWearRate": 8.0
//! }
//! ```
//!
//! Imports are strict: every field must be present, numeric and
//! non-negative, otherwise the import is rejected as a whole.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{QuoteError, QuoteResult};

/// Overhead rates injected into every price calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadConfig {
    /// Currency per kWh
    pub electricity_rate: f64,
    /// Currency per print hour
    pub labor_rate: f64,
    /// Profit margin applied on top of the base cost, in percent
    pub profit_margin_percent: f64,
    /// Currency per print hour
    pub machine_wear_rate: f64,
    /// Currency per 100 g of filament (waste included)
    pub spool_wear_rate: f64,
}

impl Default for OverheadConfig {
    fn default() -> Self {
        OverheadConfig {
            electricity_rate: 2.8,
            labor_rate: 28.0,
            profit_margin_percent: 18.0,
            machine_wear_rate: 12.0,
            spool_wear_rate: 8.0,
        }
    }
}

impl OverheadConfig {
    /// Field names paired with their values, in export order
    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("electricityRate", self.electricity_rate),
            ("laborRate", self.labor_rate),
            ("profitMarginPercent", self.profit_margin_percent),
            ("machineWearRate", self.machine_wear_rate),
            ("spoolWearRate", self.spool_wear_rate),
        ]
    }

    /// Check that every rate is finite and non-negative.
    pub fn validate(&self) -> QuoteResult<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(QuoteError::invalid_input(
                    field,
                    value.to_string(),
                    "Rate must be a non-negative number",
                ));
            }
        }
        Ok(())
    }

    /// Parse an exported configuration.
    ///
    /// Unknown keys (e.g. an export timestamp) are ignored; missing, non-numeric
    /// or negative rates reject the whole import.
    ///
    /// ```rust
    /// use quote_core::overhead::OverheadConfig;
    ///
    /// let json = r#"{"electricityRate":3,"laborRate":30,"profitMarginPercent":20,
    ///               "machineWearRate":10,"spoolWearRate":5}"#;
    /// let config = OverheadConfig::from_json(json).unwrap();
    /// assert_eq!(config.labor_rate, 30.0);
    ///
    /// assert!(OverheadConfig::from_json(r#"{"laborRate":30}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> QuoteResult<Self> {
        let config: OverheadConfig = serde_json::from_str(json).map_err(|e| {
            warn!("Rejected overhead import: {}", e);
            QuoteError::config_import(e.to_string())
        })?;

        config.validate().map_err(|e| {
            warn!("Rejected overhead import: {}", e);
            QuoteError::config_import(e.to_string())
        })?;

        Ok(config)
    }

    /// Serialize for export (pretty-printed).
    pub fn to_json(&self) -> QuoteResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuoteError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Apply the fields set in `patch`, leaving the rest unchanged.
    ///
    /// The merged result is validated before it replaces `self`.
    pub fn merge(&mut self, patch: &OverheadPatch) -> QuoteResult<()> {
        let merged = OverheadConfig {
            electricity_rate: patch.electricity_rate.unwrap_or(self.electricity_rate),
            labor_rate: patch.labor_rate.unwrap_or(self.labor_rate),
            profit_margin_percent: patch.profit_margin_percent.unwrap_or(self.profit_margin_percent),
            machine_wear_rate: patch.machine_wear_rate.unwrap_or(self.machine_wear_rate),
            spool_wear_rate: patch.spool_wear_rate.unwrap_or(self.spool_wear_rate),
        };
        merged.validate()?;
        *self = merged;
        Ok(())
    }
}

/// Partial update for [`OverheadConfig::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadPatch {
    pub electricity_rate: Option<f64>,
    pub labor_rate: Option<f64>,
    pub profit_margin_percent: Option<f64>,
    pub machine_wear_rate: Option<f64>,
    pub spool_wear_rate: Option<f64>,
}

impl OverheadPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == OverheadPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OverheadConfig::default();
        assert_eq!(config.electricity_rate, 2.8);
        assert_eq!(config.labor_rate, 28.0);
        assert_eq!(config.profit_margin_percent, 18.0);
        assert_eq!(config.machine_wear_rate, 12.0);
        assert_eq!(config.spool_wear_rate, 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_field_names() {
        let json = OverheadConfig::default().to_json().unwrap();
        assert!(json.contains("\"electricityRate\""));
        assert!(json.contains("\"profitMarginPercent\""));
        assert!(json.contains("\"spoolWearRate\""));
    }

    #[test]
    fn test_import_roundtrip_ignores_extra_keys() {
        let json = r#"{
            "electricityRate": 1.5,
            "laborRate": 20,
            "profitMarginPercent": 0,
            "machineWearRate": 8,
            "spoolWearRate": 5,
            "timestamp": 1700000000000
        }"#;
        let config = OverheadConfig::from_json(json).unwrap();
        assert_eq!(config.electricity_rate, 1.5);
        assert_eq!(config.profit_margin_percent, 0.0);
    }

    #[test]
    fn test_import_rejects_bad_input() {
        // Not JSON
        let err = OverheadConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_IMPORT");

        // Missing field
        let err = OverheadConfig::from_json(
            r#"{"electricityRate":1,"laborRate":1,"profitMarginPercent":1,"machineWearRate":1}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_IMPORT");

        // Non-numeric
        assert!(OverheadConfig::from_json(
            r#"{"electricityRate":"1","laborRate":1,"profitMarginPercent":1,"machineWearRate":1,"spoolWearRate":1}"#,
        )
        .is_err());

        // Negative
        assert!(OverheadConfig::from_json(
            r#"{"electricityRate":1,"laborRate":-1,"profitMarginPercent":1,"machineWearRate":1,"spoolWearRate":1}"#,
        )
        .is_err());
    }

    #[test]
    fn test_merge() {
        let mut config = OverheadConfig::default();
        let patch = OverheadPatch {
            labor_rate: Some(35.0),
            ..Default::default()
        };
        config.merge(&patch).unwrap();
        assert_eq!(config.labor_rate, 35.0);
        assert_eq!(config.electricity_rate, 2.8);
    }

    #[test]
    fn test_merge_rejects_negative_without_mutation() {
        let mut config = OverheadConfig::default();
        let patch = OverheadPatch {
            labor_rate: Some(50.0),
            spool_wear_rate: Some(-1.0),
            ..Default::default()
        };
        assert!(config.merge(&patch).is_err());
        assert_eq!(config, OverheadConfig::default());
        assert!(OverheadPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
