// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::info;

use gridion_types::{RiskThresholds, TrendBands};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridionConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub neso: NesoSettings,
    #[serde(default)]
    pub datasets: DatasetSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub map: MapSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NesoSettings {
    #[serde(default = "default_neso_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_negative_prices_url")]
    pub negative_prices_url: String,
    #[serde(default = "default_repd_geojson_url")]
    pub repd_geojson_url: String,
    #[serde(default = "default_negative_price_year")]
    pub negative_price_year: i32,
    #[serde(default = "default_spend_row_limit")]
    pub spend_row_limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskSettings {
    #[serde(default)]
    pub thresholds: RiskThresholds,
    #[serde(default)]
    pub trend: TrendBands,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapSettings {
    /// Access token passed to the map renderer. The GRIDION_MAP_TOKEN
    /// environment variable overrides the file value.
    #[serde(default)]
    pub access_token: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8180
}

fn default_neso_base_url() -> String {
    "https://api.neso.energy".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_negative_prices_url() -> String {
    "https://kuzgtbnlazsvcjuazowt.supabase.co/storage/v1/object/public/hackathon/negative_prices.csv"
        .to_owned()
}

fn default_repd_geojson_url() -> String {
    "https://kuzgtbnlazsvcjuazowt.supabase.co/storage/v1/object/public/hackathon/repd-q2-jul-2025.geojson"
        .to_owned()
}

fn default_negative_price_year() -> i32 {
    2024
}

fn default_spend_row_limit() -> u32 {
    10000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for NesoSettings {
    fn default() -> Self {
        Self {
            base_url: default_neso_base_url(),
            timeout_secs: default_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            negative_prices_url: default_negative_prices_url(),
            repd_geojson_url: default_repd_geojson_url(),
            negative_price_year: default_negative_price_year(),
            spend_row_limit: default_spend_row_limit(),
        }
    }
}

impl GridionConfig {
    /// Load the TOML config, falling back to built-in defaults when the
    /// file does not exist. A file that exists but fails to parse or
    /// validate is an error, never silently ignored.
    pub fn load_or_default(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            let config: Self =
                toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
            config.validate()?;
            config
        } else {
            info!("No config file at {path}, using defaults");
            Self::default()
        };

        if let Ok(token) = std::env::var("GRIDION_MAP_TOKEN") {
            config.map.access_token = token;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.neso.timeout_secs == 0 {
            bail!("neso.timeout_secs must be greater than zero");
        }
        if self.neso.refresh_interval_secs == 0 {
            bail!("neso.refresh_interval_secs must be greater than zero");
        }
        let t = &self.risk.thresholds;
        if !(t.medium < t.high && t.high < t.critical) {
            bail!("risk.thresholds must be strictly ascending: medium < high < critical");
        }
        if self.risk.trend.stable_mw < 0.0 {
            bail!("risk.trend.stable_mw must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GridionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: GridionConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [risk.thresholds]
            medium = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.risk.thresholds.medium, 30.0);
        // Unset threshold fields keep their defaults
        assert_eq!(config.risk.thresholds.high, 70.0);
        assert_eq!(config.neso.timeout_secs, 10);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let config: GridionConfig = toml::from_str(
            r#"
            [risk.thresholds]
            medium = 80.0
            high = 70.0
            critical = 90.0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
