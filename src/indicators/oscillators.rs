use crate::error::{check_finite, check_output, check_period, IndicatorError, Result};
use crate::indicators::overlaps::OverlapCalculator;
use crate::indicators::series::{difference, unavailable, Compacted, Series};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// MACD line, signal line and histogram, each aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdOutput {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Stochastic %K and %D lines, each aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticOutput {
    pub k: Series,
    pub d: Series,
}

/// Where an RSI reading sits relative to the overbought/oversold thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiZone::Overbought => write!(f, "overbought"),
            RsiZone::Neutral => write!(f, "neutral"),
            RsiZone::Oversold => write!(f, "oversold"),
        }
    }
}

pub struct OscillatorCalculator;

impl OscillatorCalculator {
    // Calculate RSI with Wilder smoothing.
    //
    // The seed average over the first `period` changes is not emitted; the
    // first value lands at index `period + 1` after one smoothing step.
    pub fn calculate_rsi(data: &[f64], period: usize) -> Result<Series> {
        check_period("period", period)?;
        check_finite(data)?;

        let mut result = unavailable(data.len());
        if data.len() < period + 1 {
            debug!(
                "Not enough data points for RSI({}): {} values",
                period,
                data.len()
            );
            return Ok(result);
        }

        let (gains, losses): (Vec<f64>, Vec<f64>) = data
            .windows(2)
            .map(|w| {
                let change = w[1] - w[0];
                (change.max(0.0), (-change).max(0.0))
            })
            .unzip();

        let period_f = period as f64;
        let mut avg_gain = gains[..period].iter().sum::<f64>() / period_f;
        let mut avg_loss = losses[..period].iter().sum::<f64>() / period_f;

        for j in period..gains.len() {
            avg_gain = (avg_gain * (period_f - 1.0) + gains[j]) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) + losses[j]) / period_f;

            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            };
            result[j + 1] = Some(rsi);
        }

        check_output("RSI", &result)?;
        Ok(result)
    }

    // Classify an RSI reading against the configured thresholds
    pub fn classify_rsi(value: f64, overbought: f64, oversold: f64) -> RsiZone {
        if value >= overbought {
            RsiZone::Overbought
        } else if value <= oversold {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }

    // Calculate MACD. The signal line is an EMA over the available MACD
    // values only, mapped back to the positions they came from.
    pub fn calculate_macd(
        data: &[f64],
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<MacdOutput> {
        check_period("fast_period", fast_period)?;
        check_period("slow_period", slow_period)?;
        check_period("signal_period", signal_period)?;

        let fast = OverlapCalculator::calculate_ema(data, fast_period)?;
        let slow = OverlapCalculator::calculate_ema(data, slow_period)?;
        let macd = difference(&fast, &slow);
        check_output("MACD", &macd)?;

        let compacted = Compacted::from_series(&macd);
        let signal_values = OverlapCalculator::calculate_ema(&compacted.values, signal_period)?;
        let signal = compacted.expand(&signal_values, data.len());

        let histogram = difference(&macd, &signal);
        check_output("MACD", &histogram)?;

        Ok(MacdOutput {
            macd,
            signal,
            histogram,
        })
    }

    // Calculate the stochastic oscillator. %D is the SMA of the available %K
    // values, mapped back to the positions they came from.
    pub fn calculate_stochastic(
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
        k_period: usize,
        d_period: usize,
    ) -> Result<StochasticOutput> {
        check_period("k_period", k_period)?;
        check_period("d_period", d_period)?;

        if highs.len() != closes.len() || lows.len() != closes.len() {
            return Err(IndicatorError::LengthMismatch {
                highs: highs.len(),
                lows: lows.len(),
                closes: closes.len(),
            });
        }

        check_finite(highs)?;
        check_finite(lows)?;
        check_finite(closes)?;

        let len = closes.len();
        let mut k = unavailable(len);

        if len >= k_period {
            for i in (k_period - 1)..len {
                let start = i + 1 - k_period;
                let highest = highs[start..=i]
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
                let lowest = lows[start..=i]
                    .iter()
                    .copied()
                    .fold(f64::INFINITY, f64::min);

                k[i] = Some(if highest == lowest {
                    50.0
                } else {
                    (closes[i] - lowest) / (highest - lowest) * 100.0
                });
            }
        } else {
            debug!(
                "Not enough data points for Stochastic({}, {}): {} values",
                k_period, d_period, len
            );
        }

        check_output("STOCH", &k)?;

        let compacted = Compacted::from_series(&k);
        let d_values = OverlapCalculator::calculate_sma(&compacted.values, d_period)?;
        let d = compacted.expand(&d_values, len);

        Ok(StochasticOutput { k, d })
    }
}
