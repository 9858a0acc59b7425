pub mod cli;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod processor;
pub mod utils;

pub use error::{IndicatorError, Result};
pub use indicators::calculator::{IndicatorCalculator, IndicatorKind, IndicatorOutput, IndicatorParams};
pub use indicators::heikin_ashi::HeikinAshiCalculator;
pub use indicators::oscillators::{MacdOutput, OscillatorCalculator, RsiZone, StochasticOutput};
pub use indicators::overlaps::{BollingerOutput, OverlapCalculator};
pub use indicators::series::Series;
pub use models::candle::{Candle, CandleData};
