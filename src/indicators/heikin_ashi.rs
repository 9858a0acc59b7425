use crate::error::{IndicatorError, Result};
use crate::models::candle::Candle;

/// Heikin-Ashi candle transform.
///
/// Each output candle's open depends on the previous output candle, so the
/// series is built in one left-to-right pass. Time and volume pass through.
pub struct HeikinAshiCalculator;

impl HeikinAshiCalculator {
    pub fn calculate_heikin_ashi(candles: &[Candle]) -> Result<Vec<Candle>> {
        let mut result: Vec<Candle> = Vec::with_capacity(candles.len());

        for (index, candle) in candles.iter().enumerate() {
            for value in [candle.open, candle.high, candle.low, candle.close] {
                if !value.is_finite() {
                    return Err(IndicatorError::NonFiniteInput { index, value });
                }
            }

            let ha_close = (candle.open + candle.high + candle.low + candle.close) / 4.0;
            let ha_open = match result.last() {
                Some(prev) => (prev.open + prev.close) / 2.0,
                None => (candle.open + candle.close) / 2.0,
            };

            if !ha_close.is_finite() || !ha_open.is_finite() {
                return Err(IndicatorError::NumericOverflow {
                    indicator: "HEIKIN_ASHI",
                    index,
                });
            }

            result.push(Candle {
                time: candle.time,
                open: ha_open,
                high: candle.high.max(ha_open).max(ha_close),
                low: candle.low.min(ha_open).min(ha_close),
                close: ha_close,
                volume: candle.volume,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_candle_opens_at_previous_midpoint() {
        let candles = [
            Candle::new(60, 100.0, 110.0, 90.0, 105.0, 1.0),
            Candle::new(120, 105.0, 108.0, 104.0, 107.0, 2.0),
        ];
        let ha = HeikinAshiCalculator::calculate_heikin_ashi(&candles).unwrap();

        // first: open 102.5, close 101.25
        assert_eq!(ha[1].open, (102.5 + 101.25) / 2.0);
        assert_eq!(ha[1].close, 106.0);
        assert_eq!(ha[1].high, 108.0);
        assert_eq!(ha[1].low, 101.875);
        assert_eq!((ha[1].time, ha[1].volume), (120, 2.0));
    }

    #[test]
    fn empty_input() {
        assert!(HeikinAshiCalculator::calculate_heikin_ashi(&[]).unwrap().is_empty());
    }

    #[test]
    fn nan_price_is_rejected() {
        let candles = [
            Candle::new(60, 1.0, 1.0, 1.0, 1.0, 0.0),
            Candle::new(120, 1.0, f64::NAN, 1.0, 1.0, 0.0),
        ];
        let err = HeikinAshiCalculator::calculate_heikin_ashi(&candles).unwrap_err();
        assert!(matches!(err, IndicatorError::NonFiniteInput { index: 1, .. }));
    }

    #[test]
    fn overflowing_prices_are_rejected() {
        let candles = [Candle::new(60, f64::MAX, f64::MAX, f64::MAX, f64::MAX, 0.0)];
        let err = HeikinAshiCalculator::calculate_heikin_ashi(&candles).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::NumericOverflow {
                indicator: "HEIKIN_ASHI",
                index: 0
            }
        );
    }
}
