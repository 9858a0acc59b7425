#![allow(dead_code)]

use candle_indicators::Candle;

/// Assert two floats agree within `tolerance`.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{context}: expected {expected}, got {actual} (tolerance {tolerance})"
    );
}

/// Number of leading unavailable positions.
pub fn warm_up(series: &[Option<f64>]) -> usize {
    series.iter().take_while(|v| v.is_none()).count()
}

/// Close prices from the classic 16-bar RSI walkthrough.
pub const RSI_CLOSES: [f64; 16] = [
    44.0, 44.34, 44.09, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61,
    46.28, 46.28, 46.00,
];

/// Deterministic candles oscillating around 100, one minute apart.
pub fn wave_candles(len: usize) -> Vec<Candle> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            let close = 100.0 + (x * 0.3).sin() * 8.0 + x * 0.05;
            let open = close - (x * 0.7).cos();
            let high = open.max(close) + 1.0 + (x * 0.11).sin().abs();
            let low = open.min(close) - 1.0 - (x * 0.13).cos().abs();
            Candle::new(1_700_000_000 + i as i64 * 60, open, high, low, close, 10.0 + x)
        })
        .collect()
}
