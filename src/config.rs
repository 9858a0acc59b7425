// src/config.rs
use crate::processor::worker::WorkerConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_FILE: &str = "indicators";
const ENV_PREFIX: &str = "INDICATORS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiDefaults {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiDefaults {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdDefaults {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdDefaults {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerDefaults {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerDefaults {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticDefaults {
    pub k_period: usize,
    pub d_period: usize,
}

impl Default for StochasticDefaults {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// Default parameters used when a request leaves a parameter out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorDefaults {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi: RsiDefaults,
    pub macd: MacdDefaults,
    pub bollinger: BollingerDefaults,
    pub stochastic: StochasticDefaults,
}

impl Default for IndicatorDefaults {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 12,
            rsi: RsiDefaults::default(),
            macd: MacdDefaults::default(),
            bollinger: BollingerDefaults::default(),
            stochastic: StochasticDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,
    pub worker: WorkerConfig,
    pub defaults: IndicatorDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker: WorkerConfig::default(),
            defaults: IndicatorDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from built-in defaults, then `indicators.toml` (or
    /// the given file), then `INDICATORS__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}
