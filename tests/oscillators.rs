mod common;

use candle_indicators::{IndicatorError, OscillatorCalculator, OverlapCalculator};
use common::{assert_near, warm_up, wave_candles, RSI_CLOSES};

#[test]
fn rsi_walkthrough_scenario() {
    let rsi = OscillatorCalculator::calculate_rsi(&RSI_CLOSES, 14).unwrap();

    assert_eq!(rsi.len(), 16);
    assert!(rsi[..15].iter().all(Option::is_none));

    let value = rsi[15].unwrap();
    assert!((0.0..=100.0).contains(&value));
    assert_near(value, 68.80116959064324, 1e-9, "RSI(14) at 15");
}

#[test]
fn rsi_saturates_on_monotonic_input() {
    let rising: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
    let falling: Vec<f64> = rising.iter().rev().copied().collect();

    let up = OscillatorCalculator::calculate_rsi(&rising, 14).unwrap();
    let down = OscillatorCalculator::calculate_rsi(&falling, 14).unwrap();

    assert_eq!(warm_up(&up), 15);
    assert_eq!(up[15], Some(100.0));
    assert_eq!(down[15], Some(0.0));
}

#[test]
fn rsi_short_input_is_all_unavailable() {
    let rsi = OscillatorCalculator::calculate_rsi(&RSI_CLOSES[..10], 14).unwrap();
    assert_eq!(rsi, vec![None; 10]);
    assert!(OscillatorCalculator::calculate_rsi(&[], 14).unwrap().is_empty());
}

#[test]
fn macd_lines_are_consistent() {
    let closes: Vec<f64> = wave_candles(80).iter().map(|c| c.close).collect();
    let out = OscillatorCalculator::calculate_macd(&closes, 12, 26, 9).unwrap();
    let fast = OverlapCalculator::calculate_ema(&closes, 12).unwrap();
    let slow = OverlapCalculator::calculate_ema(&closes, 26).unwrap();

    assert_eq!(warm_up(&out.macd), 25);
    assert_eq!(warm_up(&out.signal), 25 + 8);
    assert_eq!(warm_up(&out.histogram), 25 + 8);

    for i in 0..closes.len() {
        if let (Some(f), Some(s)) = (fast[i], slow[i]) {
            assert_near(out.macd[i].unwrap(), f - s, 1e-9, &format!("MACD at {i}"));
        }
        if let (Some(m), Some(s)) = (out.macd[i], out.signal[i]) {
            assert_near(out.histogram[i].unwrap(), m - s, 1e-9, &format!("histogram at {i}"));
        }
    }
}

#[test]
fn macd_signal_seed_is_mean_of_first_macd_values() {
    let closes: Vec<f64> = wave_candles(60).iter().map(|c| c.close).collect();
    let out = OscillatorCalculator::calculate_macd(&closes, 12, 26, 9).unwrap();

    let first_nine: f64 = out.macd[25..34].iter().map(|v| v.unwrap()).sum::<f64>() / 9.0;
    assert_near(out.signal[33].unwrap(), first_nine, 1e-12, "signal seed");
}

#[test]
fn macd_short_input_and_empty() {
    let out = OscillatorCalculator::calculate_macd(&[1.0, 2.0, 3.0], 12, 26, 9).unwrap();
    assert_eq!(out.macd, vec![None; 3]);
    assert_eq!(out.signal, vec![None; 3]);
    assert_eq!(out.histogram, vec![None; 3]);

    let empty = OscillatorCalculator::calculate_macd(&[], 12, 26, 9).unwrap();
    assert!(empty.macd.is_empty());
}

#[test]
fn macd_rejects_zero_signal_period() {
    assert_eq!(
        OscillatorCalculator::calculate_macd(&[1.0; 40], 12, 26, 0),
        Err(IndicatorError::InvalidPeriod {
            name: "signal_period",
            value: 0
        })
    );
}

#[test]
fn stochastic_flat_market_is_fifty() {
    let flat = [7.0; 20];
    let out = OscillatorCalculator::calculate_stochastic(&flat, &flat, &flat, 14, 3).unwrap();

    assert_eq!(warm_up(&out.k), 13);
    assert_eq!(warm_up(&out.d), 13 + 2);
    assert!(out.k.iter().flatten().all(|&k| k == 50.0));
    assert!(out.d.iter().flatten().all(|&d| d == 50.0));
}

#[test]
fn stochastic_stays_in_range() {
    let candles = wave_candles(60);
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let out = OscillatorCalculator::calculate_stochastic(&highs, &lows, &closes, 14, 3).unwrap();
    for v in out.k.iter().chain(out.d.iter()).flatten() {
        assert!((0.0..=100.0).contains(v), "out of range: {v}");
    }
}

#[test]
fn stochastic_rejects_zero_periods_and_nan() {
    let data = [1.0, 2.0, 3.0];
    assert!(OscillatorCalculator::calculate_stochastic(&data, &data, &data, 0, 3).is_err());
    assert!(OscillatorCalculator::calculate_stochastic(&data, &data, &data, 3, 0).is_err());

    let with_nan = [1.0, f64::NAN, 3.0];
    assert!(matches!(
        OscillatorCalculator::calculate_stochastic(&data, &data, &with_nan, 2, 2),
        Err(IndicatorError::NonFiniteInput { index: 1, .. })
    ));
}

#[test]
fn rsi_overflowing_changes_are_errors() {
    let err = OscillatorCalculator::calculate_rsi(&[f64::MAX, -f64::MAX, f64::MAX], 1).unwrap_err();
    assert!(matches!(
        err,
        IndicatorError::NumericOverflow { indicator: "RSI", index: 2 }
    ));
}
