use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::debug;

// Utility function to measure execution time of operations
pub fn measure_time<F, T>(operation_name: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    debug!("{} completed in {:.2?}", operation_name, elapsed);

    (result, elapsed)
}

// Format a Unix timestamp (seconds) for logging
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} (out of range)", timestamp),
    }
}
