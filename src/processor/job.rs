use crate::indicators::calculator::IndicatorKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One indicator to compute as part of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationJob {
    /// Caller-chosen label, echoed back in the result
    pub id: String,
    pub indicator: IndicatorKind,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl CalculationJob {
    pub fn new(id: impl Into<String>, indicator: IndicatorKind, parameters: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            indicator,
            parameters,
        }
    }

    pub fn cache_key(&self) -> String {
        format!("job:{}:{}:{}", self.id, self.indicator, self.parameters)
    }
}

/// Read a JSON array of jobs from a file.
pub fn load_jobs(path: &Path) -> Result<Vec<CalculationJob>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {}", path.display()))?;

    serde_json::from_str(&json).with_context(|| format!("Invalid job definitions in {}", path.display()))
}
