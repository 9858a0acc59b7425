// src/error.rs
use thiserror::Error;

/// Errors raised by the indicator engine and its calculator.
///
/// Insufficient data is not an error: those calls return a series where every
/// position is unavailable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{name} must be greater than 0, got {value}")]
    InvalidPeriod { name: &'static str, value: usize },

    #[error("input arrays must have the same length (highs: {highs}, lows: {lows}, closes: {closes})")]
    LengthMismatch {
        highs: usize,
        lows: usize,
        closes: usize,
    },

    #[error("input value at index {index} is not finite: {value}")]
    NonFiniteInput { index: usize, value: f64 },

    #[error("{indicator} overflowed to a non-finite value at index {index}")]
    NumericOverflow { indicator: &'static str, index: usize },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unsupported indicator: {0}")]
    UnknownIndicator(String),
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Reject a zero period.
pub(crate) fn check_period(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(IndicatorError::InvalidPeriod { name, value });
    }
    Ok(())
}

/// Reject NaN and infinite values anywhere in the input.
pub(crate) fn check_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(IndicatorError::NonFiniteInput {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}

/// Reject a computed series holding NaN or infinity. Finite inputs near the
/// limits of `f64` can still overflow inside the arithmetic.
pub(crate) fn check_output(indicator: &'static str, series: &[Option<f64>]) -> Result<()> {
    match series.iter().position(|v| v.is_some_and(|v| !v.is_finite())) {
        Some(index) => Err(IndicatorError::NumericOverflow { indicator, index }),
        None => Ok(()),
    }
}
