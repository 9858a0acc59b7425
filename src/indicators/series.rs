// Index-aligned indicator output and the compaction helpers shared by
// MACD's signal line and the stochastic %D line.

/// An indicator series aligned index-for-index with its input.
/// `None` marks a warm-up position with insufficient history.
pub type Series = Vec<Option<f64>>;

/// A series with every position unavailable.
pub fn unavailable(len: usize) -> Series {
    vec![None; len]
}

/// Available values of a series in order, together with the original index
/// of each one.
#[derive(Debug, Clone, PartialEq)]
pub struct Compacted {
    pub values: Vec<f64>,
    pub positions: Vec<usize>,
}

impl Compacted {
    /// Drop the unavailable positions of `series`, remembering where each
    /// remaining value came from.
    pub fn from_series(series: &[Option<f64>]) -> Self {
        let (positions, values) = series
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| value.map(|v| (idx, v)))
            .unzip();

        Self { values, positions }
    }

    /// Map a series computed over `values` back into an original index space
    /// of length `len`. Positions the map does not reach stay unavailable.
    pub fn expand(&self, derived: &[Option<f64>], len: usize) -> Series {
        let mut out = unavailable(len);
        for (value, &position) in derived.iter().zip(&self.positions) {
            out[position] = *value;
        }
        out
    }
}

/// Element-wise `a - b` wherever both sides are available.
pub fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}
