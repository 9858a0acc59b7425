use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// One OHLCV bar. `time` is a Unix timestamp in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCandle")]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// The backend sends prices either as JSON numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn to_f64(&self, field: &str) -> Result<f64, String> {
        match self {
            NumberOrString::Number(n) => Ok(*n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("field '{}' is not numeric: {:?}", field, s)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

impl TimeValue {
    fn to_unix_seconds(&self) -> Result<i64, String> {
        match self {
            TimeValue::Seconds(s) => Ok(*s),
            TimeValue::Fractional(f) => Ok(f.trunc() as i64),
            TimeValue::Text(s) => parse_timestamp(s),
        }
    }
}

/// Normalize a textual timestamp (integer seconds or ISO-8601) to Unix seconds.
pub fn parse_timestamp(s: &str) -> Result<i64, String> {
    let s = s.trim();

    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }

    // ISO-8601 without an offset is taken as UTC
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc().timestamp());
        }
    }

    Err(format!("unrecognized timestamp: {:?}", s))
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    #[serde(default)]
    time: Option<TimeValue>,
    #[serde(default)]
    start: Option<TimeValue>,
    open: NumberOrString,
    high: NumberOrString,
    low: NumberOrString,
    close: NumberOrString,
    #[serde(default)]
    volume: Option<NumberOrString>,
}

impl TryFrom<RawCandle> for Candle {
    type Error = String;

    fn try_from(raw: RawCandle) -> Result<Self, Self::Error> {
        let time = raw
            .time
            .as_ref()
            .or(raw.start.as_ref())
            .ok_or_else(|| "candle has neither 'time' nor 'start'".to_string())?
            .to_unix_seconds()?;

        let volume = match &raw.volume {
            Some(v) => v.to_f64("volume")?,
            None => 0.0,
        };

        Ok(Candle {
            time,
            open: raw.open.to_f64("open")?,
            high: raw.high.to_f64("high")?,
            low: raw.low.to_f64("low")?,
            close: raw.close.to_f64("close")?,
            volume,
        })
    }
}

/// Response body of the candles endpoint, or a bare array of candles.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CandlePayload {
    Wrapped { candles: Vec<Candle> },
    Bare(Vec<Candle>),
}

impl CandlePayload {
    pub fn into_candles(self) -> Vec<Candle> {
        match self {
            CandlePayload::Wrapped { candles } => candles,
            CandlePayload::Bare(candles) => candles,
        }
    }
}

/// Parse candles from a JSON document.
pub fn parse_candles(json: &str) -> Result<Vec<Candle>> {
    let payload: CandlePayload =
        serde_json::from_str(json).context("Failed to parse candle payload")?;
    Ok(payload.into_candles())
}

/// Read candles from a JSON file, ordered by time with duplicates removed.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read candle file {}", path.display()))?;

    let candles = parse_candles(&json)
        .with_context(|| format!("Invalid candle data in {}", path.display()))?;

    debug!("Loaded {} candles from {}", candles.len(), path.display());
    Ok(sort_and_dedup(candles))
}

/// Order candles by time, keeping the last candle for any repeated timestamp.
pub fn sort_and_dedup(mut candles: Vec<Candle>) -> Vec<Candle> {
    let before = candles.len();

    // stable sort keeps arrival order within a timestamp
    candles.sort_by_key(|c| c.time);

    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match out.last_mut() {
            Some(last) if last.time == candle.time => *last = candle,
            _ => out.push(candle),
        }
    }

    if out.len() != before {
        warn!("Dropped {} candles with duplicate timestamps", before - out.len());
    }

    out
}

/// Columnar view over a candle sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleData {
    pub time: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleData {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut data = Self {
            time: Vec::with_capacity(candles.len()),
            open: Vec::with_capacity(candles.len()),
            high: Vec::with_capacity(candles.len()),
            low: Vec::with_capacity(candles.len()),
            close: Vec::with_capacity(candles.len()),
            volume: Vec::with_capacity(candles.len()),
        };

        for c in candles {
            data.time.push(c.time);
            data.open.push(c.open);
            data.high.push(c.high);
            data.low.push(c.low);
            data.close.push(c.close);
            data.volume.push(c.volume);
        }

        data
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Rebuild row-oriented candles.
    pub fn to_candles(&self) -> Vec<Candle> {
        (0..self.len())
            .map(|i| {
                Candle::new(
                    self.time[i],
                    self.open[i],
                    self.high[i],
                    self.low[i],
                    self.close[i],
                    self.volume[i],
                )
            })
            .collect()
    }
}
