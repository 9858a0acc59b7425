use crate::config::IndicatorDefaults;
use crate::error::{IndicatorError, Result};
use crate::indicators::heikin_ashi::HeikinAshiCalculator;
use crate::indicators::oscillators::{MacdOutput, OscillatorCalculator, RsiZone, StochasticOutput};
use crate::indicators::overlaps::{BollingerOutput, OverlapCalculator};
use crate::indicators::series::Series;
use crate::models::candle::{Candle, CandleData};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Macd,
    BollingerBands,
    Stochastic,
    HeikinAshi,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 7] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::BollingerBands,
        IndicatorKind::Stochastic,
        IndicatorKind::HeikinAshi,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "Simple Moving Average",
            IndicatorKind::Ema => "Exponential Moving Average",
            IndicatorKind::Rsi => "Relative Strength Index",
            IndicatorKind::Macd => "Moving Average Convergence Divergence",
            IndicatorKind::BollingerBands => "Bollinger Bands",
            IndicatorKind::Stochastic => "Stochastic Oscillator",
            IndicatorKind::HeikinAshi => "Heikin-Ashi Candles",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::BollingerBands => "BBANDS",
            IndicatorKind::Stochastic => "STOCH",
            IndicatorKind::HeikinAshi => "HEIKIN_ASHI",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        // Map commonly used variations to the canonical kinds
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SMA" => Ok(IndicatorKind::Sma),
            "EMA" => Ok(IndicatorKind::Ema),
            "RSI" => Ok(IndicatorKind::Rsi),
            "MACD" => Ok(IndicatorKind::Macd),
            "BBANDS" | "BOLLINGER" | "BOLLINGER_BANDS" => Ok(IndicatorKind::BollingerBands),
            "STOCH" | "STOCHASTIC" => Ok(IndicatorKind::Stochastic),
            "HEIKIN_ASHI" | "HEIKINASHI" | "HA" => Ok(IndicatorKind::HeikinAshi),
            _ => Err(IndicatorError::UnknownIndicator(s.to_string())),
        }
    }
}

impl TryFrom<String> for IndicatorKind {
    type Error = IndicatorError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<IndicatorKind> for String {
    fn from(kind: IndicatorKind) -> Self {
        kind.to_string()
    }
}

/// Fully resolved parameters for one indicator run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "indicator", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorParams {
    Sma {
        period: usize,
    },
    Ema {
        period: usize,
    },
    Rsi {
        period: usize,
        overbought: f64,
        oversold: f64,
    },
    Macd {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },
    #[serde(rename = "BBANDS")]
    BollingerBands {
        period: usize,
        std_dev: f64,
    },
    #[serde(rename = "STOCH")]
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    HeikinAshi,
}

impl IndicatorParams {
    /// Default parameters for `kind`.
    pub fn defaults(kind: IndicatorKind, defaults: &IndicatorDefaults) -> Self {
        match kind {
            IndicatorKind::Sma => IndicatorParams::Sma {
                period: defaults.sma_period,
            },
            IndicatorKind::Ema => IndicatorParams::Ema {
                period: defaults.ema_period,
            },
            IndicatorKind::Rsi => IndicatorParams::Rsi {
                period: defaults.rsi.period,
                overbought: defaults.rsi.overbought,
                oversold: defaults.rsi.oversold,
            },
            IndicatorKind::Macd => IndicatorParams::Macd {
                fast_period: defaults.macd.fast_period,
                slow_period: defaults.macd.slow_period,
                signal_period: defaults.macd.signal_period,
            },
            IndicatorKind::BollingerBands => IndicatorParams::BollingerBands {
                period: defaults.bollinger.period,
                std_dev: defaults.bollinger.std_dev,
            },
            IndicatorKind::Stochastic => IndicatorParams::Stochastic {
                k_period: defaults.stochastic.k_period,
                d_period: defaults.stochastic.d_period,
            },
            IndicatorKind::HeikinAshi => IndicatorParams::HeikinAshi,
        }
    }

    /// Resolve parameters from a JSON object, taking defaults for missing keys.
    /// `null` is treated as an empty object.
    pub fn from_json(kind: IndicatorKind, params: &Value, defaults: &IndicatorDefaults) -> Result<Self> {
        let empty = Map::new();
        let map = match params {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(IndicatorError::InvalidParameter {
                    name: "parameters".to_string(),
                    reason: format!("expected a JSON object, got {}", other),
                })
            }
        };

        let resolved = match Self::defaults(kind, defaults) {
            IndicatorParams::Sma { period } => IndicatorParams::Sma {
                period: get_integer_param(map, "period", period)?,
            },
            IndicatorParams::Ema { period } => IndicatorParams::Ema {
                period: get_integer_param(map, "period", period)?,
            },
            IndicatorParams::Rsi {
                period,
                overbought,
                oversold,
            } => IndicatorParams::Rsi {
                period: get_integer_param(map, "period", period)?,
                overbought: get_float_param(map, "overbought", overbought)?,
                oversold: get_float_param(map, "oversold", oversold)?,
            },
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => IndicatorParams::Macd {
                fast_period: get_integer_param(map, "fast_period", fast_period)?,
                slow_period: get_integer_param(map, "slow_period", slow_period)?,
                signal_period: get_integer_param(map, "signal_period", signal_period)?,
            },
            IndicatorParams::BollingerBands { period, std_dev } => IndicatorParams::BollingerBands {
                period: get_integer_param(map, "period", period)?,
                std_dev: get_float_param(map, "std_dev", std_dev)?,
            },
            IndicatorParams::Stochastic { k_period, d_period } => IndicatorParams::Stochastic {
                k_period: get_integer_param(map, "k_period", k_period)?,
                d_period: get_integer_param(map, "d_period", d_period)?,
            },
            IndicatorParams::HeikinAshi => IndicatorParams::HeikinAshi,
        };

        Ok(resolved)
    }

    /// Parameters as a JSON object, without the indicator tag.
    pub fn to_json(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("indicator");
        }
        value
    }
}

// Helper method to get an integer parameter
fn get_integer_param(params: &Map<String, Value>, name: &str, default: usize) -> Result<usize> {
    match params.get(name) {
        None | Some(Value::Null) => {
            debug!("Using default value {} for parameter {}", default, name);
            Ok(default)
        }
        Some(value) => value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| IndicatorError::InvalidParameter {
                name: name.to_string(),
                reason: format!("expected a non-negative integer, got {}", value),
            }),
    }
}

// Helper method to get a float parameter
fn get_float_param(params: &Map<String, Value>, name: &str, default: f64) -> Result<f64> {
    match params.get(name) {
        None | Some(Value::Null) => {
            debug!("Using default value {} for parameter {}", default, name);
            Ok(default)
        }
        Some(value) => value.as_f64().ok_or_else(|| IndicatorError::InvalidParameter {
            name: name.to_string(),
            reason: format!("expected a number, got {}", value),
        }),
    }
}

/// RSI values with their overbought/oversold classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiOutput {
    pub rsi: Series,
    pub zone: Vec<Option<RsiZone>>,
}

/// Result of one indicator run, aligned with the candles it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorOutput {
    Line(Series),
    Rsi(RsiOutput),
    Macd(MacdOutput),
    Bands(BollingerOutput),
    Stochastic(StochasticOutput),
    Candles(Vec<Candle>),
}

/// One output position paired with its candle time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    pub time: i64,
    pub value: Value,
}

impl IndicatorOutput {
    pub fn len(&self) -> usize {
        match self {
            IndicatorOutput::Line(series) => series.len(),
            IndicatorOutput::Rsi(out) => out.rsi.len(),
            IndicatorOutput::Macd(out) => out.macd.len(),
            IndicatorOutput::Bands(out) => out.middle.len(),
            IndicatorOutput::Stochastic(out) => out.k.len(),
            IndicatorOutput::Candles(candles) => candles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON value at position `i`; unavailable values become `null`.
    pub fn value_at(&self, i: usize) -> Value {
        match self {
            IndicatorOutput::Line(series) => json!(series[i]),
            IndicatorOutput::Rsi(out) => json!({
                "rsi": out.rsi[i],
                "zone": out.zone[i],
            }),
            IndicatorOutput::Macd(out) => json!({
                "macd": out.macd[i],
                "signal": out.signal[i],
                "histogram": out.histogram[i],
            }),
            IndicatorOutput::Bands(out) => json!({
                "upper": out.upper[i],
                "middle": out.middle[i],
                "lower": out.lower[i],
            }),
            IndicatorOutput::Stochastic(out) => json!({
                "k": out.k[i],
                "d": out.d[i],
            }),
            IndicatorOutput::Candles(candles) => json!(candles[i]),
        }
    }

    /// Pair each position with the time of the candle it belongs to.
    pub fn to_timed_values(&self, times: &[i64]) -> Vec<TimedValue> {
        times
            .iter()
            .take(self.len())
            .enumerate()
            .map(|(i, &time)| TimedValue {
                time,
                value: self.value_at(i),
            })
            .collect()
    }
}

/// Entry of the available-indicators table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Every supported indicator with its default parameters.
pub fn available_indicators(defaults: &IndicatorDefaults) -> Vec<IndicatorInfo> {
    IndicatorKind::ALL
        .iter()
        .map(|kind| IndicatorInfo {
            name: kind.to_string(),
            description: kind.description().to_string(),
            parameters: IndicatorParams::defaults(*kind, defaults).to_json(),
        })
        .collect()
}

pub struct IndicatorCalculator;

impl IndicatorCalculator {
    // Run one indicator over the candle data
    pub fn calculate(candle_data: &CandleData, params: &IndicatorParams) -> Result<IndicatorOutput> {
        debug!("Calculating {:?} over {} candles", params, candle_data.len());

        let output = match *params {
            IndicatorParams::Sma { period } => {
                IndicatorOutput::Line(OverlapCalculator::calculate_sma(&candle_data.close, period)?)
            }
            IndicatorParams::Ema { period } => {
                IndicatorOutput::Line(OverlapCalculator::calculate_ema(&candle_data.close, period)?)
            }
            IndicatorParams::Rsi {
                period,
                overbought,
                oversold,
            } => {
                let rsi = OscillatorCalculator::calculate_rsi(&candle_data.close, period)?;
                let zone = rsi
                    .iter()
                    .map(|v| v.map(|v| OscillatorCalculator::classify_rsi(v, overbought, oversold)))
                    .collect();
                IndicatorOutput::Rsi(RsiOutput { rsi, zone })
            }
            IndicatorParams::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => IndicatorOutput::Macd(OscillatorCalculator::calculate_macd(
                &candle_data.close,
                fast_period,
                slow_period,
                signal_period,
            )?),
            IndicatorParams::BollingerBands { period, std_dev } => IndicatorOutput::Bands(
                OverlapCalculator::calculate_bollinger_bands(&candle_data.close, period, std_dev)?,
            ),
            IndicatorParams::Stochastic { k_period, d_period } => {
                IndicatorOutput::Stochastic(OscillatorCalculator::calculate_stochastic(
                    &candle_data.high,
                    &candle_data.low,
                    &candle_data.close,
                    k_period,
                    d_period,
                )?)
            }
            IndicatorParams::HeikinAshi => IndicatorOutput::Candles(
                HeikinAshiCalculator::calculate_heikin_ashi(&candle_data.to_candles())?,
            ),
        };

        Ok(output)
    }

    // Generic entry point: indicator by name, parameters as JSON
    pub fn calculate_indicator(
        candle_data: &CandleData,
        indicator_name: &str,
        parameters: &Value,
        defaults: &IndicatorDefaults,
    ) -> Result<Vec<TimedValue>> {
        let kind: IndicatorKind = indicator_name.parse()?;
        let params = IndicatorParams::from_json(kind, parameters, defaults)?;
        let output = Self::calculate(candle_data, &params)?;

        Ok(output.to_timed_values(&candle_data.time))
    }
}
