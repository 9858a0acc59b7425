mod common;

use candle_indicators::{IndicatorError, OverlapCalculator};
use common::{assert_near, warm_up};

#[test]
fn sma_matches_window_means() {
    let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let sma = OverlapCalculator::calculate_sma(&data, 4).unwrap();

    assert_eq!(sma.len(), data.len());
    assert_eq!(warm_up(&sma), 3);
    for i in 3..data.len() {
        let mean = data[i - 3..=i].iter().sum::<f64>() / 4.0;
        assert_near(sma[i].unwrap(), mean, 1e-12, &format!("SMA(4) at {i}"));
    }
}

#[test]
fn sma_period_one_is_identity() {
    let data = [1.5, -2.25, 3.125, 0.0];
    let sma = OverlapCalculator::calculate_sma(&data, 1).unwrap();
    assert_eq!(sma, data.iter().copied().map(Some).collect::<Vec<_>>());
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(OverlapCalculator::calculate_sma(&[], 5).unwrap().is_empty());
    assert!(OverlapCalculator::calculate_ema(&[], 5).unwrap().is_empty());

    let bands = OverlapCalculator::calculate_bollinger_bands(&[], 20, 2.0).unwrap();
    assert!(bands.upper.is_empty() && bands.middle.is_empty() && bands.lower.is_empty());
}

#[test]
fn zero_period_is_rejected() {
    assert_eq!(
        OverlapCalculator::calculate_sma(&[1.0], 0),
        Err(IndicatorError::InvalidPeriod {
            name: "period",
            value: 0
        })
    );
    assert!(OverlapCalculator::calculate_ema(&[1.0], 0).is_err());
    assert!(OverlapCalculator::calculate_bollinger_bands(&[1.0], 0, 2.0).is_err());
}

#[test]
fn ema_seed_is_mean_of_first_period() {
    let data = [10.0, 11.0, 12.0, 13.0, 14.0, 13.0, 12.0];
    let ema = OverlapCalculator::calculate_ema(&data, 5).unwrap();

    assert_eq!(warm_up(&ema), 4);
    assert_near(ema[4].unwrap(), 12.0, 1e-12, "EMA seed");
    // k = 1/3
    assert_near(ema[5].unwrap(), 12.0 + (13.0 - 12.0) / 3.0, 1e-12, "EMA(5) at 5");
}

#[test]
fn bollinger_constant_input_collapses_bands() {
    let data = [42.5; 30];
    let bands = OverlapCalculator::calculate_bollinger_bands(&data, 20, 2.0).unwrap();

    assert_eq!(warm_up(&bands.middle), 19);
    for i in 19..data.len() {
        assert_eq!(bands.upper[i], Some(42.5));
        assert_eq!(bands.middle[i], Some(42.5));
        assert_eq!(bands.lower[i], Some(42.5));
    }
}

#[test]
fn bollinger_flat_prices_give_equal_bands() {
    // 43250.17 is not exactly representable; the rounded mean must not
    // open up a spread
    for (price, period) in [(43250.17, 20), (0.1, 3), (1.07, 7)] {
        let data = [price; 30];
        let bands = OverlapCalculator::calculate_bollinger_bands(&data, period, 2.0).unwrap();

        for i in (period - 1)..data.len() {
            assert_eq!(bands.upper[i], bands.middle[i], "upper at {i} for {price}");
            assert_eq!(bands.lower[i], bands.middle[i], "lower at {i} for {price}");
        }
    }
}

#[test]
fn overflowing_window_sum_is_an_error() {
    let err = OverlapCalculator::calculate_sma(&[f64::MAX, f64::MAX, 1.0], 2).unwrap_err();
    assert!(matches!(err, IndicatorError::NumericOverflow { index: 1, .. }));
}

#[test]
fn bollinger_width_scales_with_multiplier() {
    let data: Vec<f64> = (0..25).map(|i| 50.0 + (i % 5) as f64).collect();
    let one = OverlapCalculator::calculate_bollinger_bands(&data, 10, 1.0).unwrap();
    let three = OverlapCalculator::calculate_bollinger_bands(&data, 10, 3.0).unwrap();

    for i in 9..data.len() {
        let w1 = one.upper[i].unwrap() - one.middle[i].unwrap();
        let w3 = three.upper[i].unwrap() - three.middle[i].unwrap();
        assert_near(w3, 3.0 * w1, 1e-9, &format!("band width at {i}"));
        assert_near(
            three.middle[i].unwrap() - three.lower[i].unwrap(),
            w3,
            1e-9,
            &format!("band symmetry at {i}"),
        );
    }
}

#[test]
fn input_is_not_mutated() {
    let data = vec![5.0, 4.0, 3.0, 2.0, 1.0];
    let copy = data.clone();
    let _ = OverlapCalculator::calculate_bollinger_bands(&data, 3, 2.0).unwrap();
    assert_eq!(data, copy);
}
