//! Engine policy constants
//!
//! All rates, caps and tables the rules engine reads. Loaded once at start, either
//! from the JSON file named by `RETIREMENT_ENGINE_CONFIG` or from the defaults below.
//! Any field missing from the file keeps its default.

use crate::error::ConfigError;
use crate::returns::TaxSchedule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "RETIREMENT_ENGINE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Annual nominal rate for the NPS profile (7.11%)
    #[serde(default = "default_nps_rate")]
    pub nps_rate: f64,

    /// Annual nominal rate for the index fund profile (14.49%)
    #[serde(default = "default_index_rate")]
    pub index_rate: f64,

    /// Age at which contributions stop compounding
    #[serde(default = "default_retirement_age")]
    pub retirement_age: u32,

    /// Horizon used when the saver is already at or past retirement age
    #[serde(default = "default_fallback_years")]
    pub fallback_years: u32,

    /// Batch remanent may not exceed this fraction of the wage (validator only)
    #[serde(default = "default_wage_cap_fraction")]
    pub wage_cap_fraction: f64,

    /// NPS deduction is limited to this fraction of annual income
    #[serde(default = "default_nps_deduction_fraction")]
    pub nps_deduction_fraction: f64,

    /// Absolute NPS deduction ceiling
    #[serde(default = "default_nps_deduction_cap")]
    pub nps_deduction_cap: f64,

    #[serde(default)]
    pub tax: TaxSchedule,

    /// Rounding step for the round-up simulator
    #[serde(default = "default_simulator_step")]
    pub simulator_step: f64,

    /// Allocator future-value rates
    #[serde(default = "default_allocator_nominal_rate")]
    pub allocator_nominal_rate: f64,
    #[serde(default = "default_allocator_real_rate")]
    pub allocator_real_rate: f64,

    /// Portfolio reported by the basic round-up simulator
    #[serde(default = "default_basic_portfolio_id")]
    pub basic_portfolio_id: u32,
}

fn default_nps_rate() -> f64 { 0.0711 }
fn default_index_rate() -> f64 { 0.1449 }
fn default_retirement_age() -> u32 { 60 }
fn default_fallback_years() -> u32 { 5 }
fn default_wage_cap_fraction() -> f64 { 0.10 }
fn default_nps_deduction_fraction() -> f64 { 0.10 }
fn default_nps_deduction_cap() -> f64 { 200_000.0 }
fn default_simulator_step() -> f64 { 10.0 }
fn default_allocator_nominal_rate() -> f64 { 0.10 }
fn default_allocator_real_rate() -> f64 { 0.06 }
fn default_basic_portfolio_id() -> u32 { 5477 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nps_rate: default_nps_rate(),
            index_rate: default_index_rate(),
            retirement_age: default_retirement_age(),
            fallback_years: default_fallback_years(),
            wage_cap_fraction: default_wage_cap_fraction(),
            nps_deduction_fraction: default_nps_deduction_fraction(),
            nps_deduction_cap: default_nps_deduction_cap(),
            tax: TaxSchedule::default(),
            simulator_step: default_simulator_step(),
            allocator_nominal_rate: default_allocator_nominal_rate(),
            allocator_real_rate: default_allocator_real_rate(),
            basic_portfolio_id: default_basic_portfolio_id(),
        }
    }
}

impl EngineConfig {
    /// Load from `RETIREMENT_ENGINE_CONFIG` if set, otherwise defaults
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                log::info!("{} not set, using default engine config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulator_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "simulator_step must be positive, got {}",
                self.simulator_step
            )));
        }
        if !(0.0..=1.0).contains(&self.wage_cap_fraction) {
            return Err(ConfigError::Invalid(format!(
                "wage_cap_fraction must be within [0, 1], got {}",
                self.wage_cap_fraction
            )));
        }
        self.tax.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.nps_rate, 0.0711);
        assert_eq!(config.index_rate, 0.1449);
        assert_eq!(config.retirement_age, 60);
        assert_eq!(config.fallback_years, 5);
        assert_eq!(config.basic_portfolio_id, 5477);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"nps_rate": 0.08}"#).expect("parse");
        assert_eq!(config.nps_rate, 0.08);
        assert_eq!(config.index_rate, 0.1449);
        assert_eq!(config.tax.rebate_limit, 700_000.0);
    }

    #[test]
    fn test_invalid_step_rejected() {
        let err = EngineConfig::from_json(r#"{"simulator_step": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
