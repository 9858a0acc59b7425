use crate::error::{check_finite, check_output, check_period, IndicatorError, Result};
use crate::indicators::series::{unavailable, Series};
use serde::Serialize;
use tracing::debug;

/// Upper, middle and lower Bollinger bands, each aligned with the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerOutput {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub struct OverlapCalculator;

impl OverlapCalculator {
    // Calculate SMA (Simple Moving Average)
    pub fn calculate_sma(data: &[f64], period: usize) -> Result<Series> {
        check_period("period", period)?;
        check_finite(data)?;

        if data.len() < period {
            debug!(
                "Not enough data points for SMA({}): {} values",
                period,
                data.len()
            );
            return Ok(unavailable(data.len()));
        }

        let mut result = unavailable(data.len());
        for i in (period - 1)..data.len() {
            let window = &data[i + 1 - period..=i];
            result[i] = Some(window.iter().sum::<f64>() / period as f64);
        }

        check_output("SMA", &result)?;
        Ok(result)
    }

    // Calculate EMA (Exponential Moving Average), seeded with the SMA of the
    // first `period` values
    pub fn calculate_ema(data: &[f64], period: usize) -> Result<Series> {
        check_period("period", period)?;
        check_finite(data)?;

        let mut result = unavailable(data.len());
        if data.len() < period {
            debug!(
                "Not enough data points for EMA({}): {} values",
                period,
                data.len()
            );
            return Ok(result);
        }

        let multiplier = 2.0 / (period as f64 + 1.0);
        let mut ema = data[..period].iter().sum::<f64>() / period as f64;
        result[period - 1] = Some(ema);

        for i in period..data.len() {
            ema = (data[i] - ema) * multiplier + ema;
            result[i] = Some(ema);
        }

        check_output("EMA", &result)?;
        Ok(result)
    }

    // Calculate Bollinger Bands around the SMA, using the population
    // standard deviation of each window
    pub fn calculate_bollinger_bands(
        data: &[f64],
        period: usize,
        std_dev: f64,
    ) -> Result<BollingerOutput> {
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(IndicatorError::InvalidParameter {
                name: "std_dev".to_string(),
                reason: format!("must be a finite non-negative multiplier, got {}", std_dev),
            });
        }

        let middle = Self::calculate_sma(data, period)?;
        let mut upper = unavailable(data.len());
        let mut lower = unavailable(data.len());

        for (i, mean) in middle.iter().enumerate() {
            let Some(mean) = *mean else { continue };

            let window = &data[i + 1 - period..=i];

            // a flat window has no spread, even when the rounded mean is
            // not exactly the repeated value
            let width = if window.iter().all(|&v| v == window[0]) {
                0.0
            } else {
                let variance = window
                    .iter()
                    .map(|v| (v - mean).powi(2))
                    .sum::<f64>()
                    / period as f64;
                std_dev * variance.sqrt()
            };

            upper[i] = Some(mean + width);
            lower[i] = Some(mean - width);
        }

        check_output("BBANDS", &upper)?;
        check_output("BBANDS", &lower)?;

        Ok(BollingerOutput {
            upper,
            middle,
            lower,
        })
    }
}
