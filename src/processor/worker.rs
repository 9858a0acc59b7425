use crate::config::IndicatorDefaults;
use crate::indicators::calculator::{IndicatorCalculator, IndicatorKind, IndicatorParams, TimedValue};
use crate::models::candle::{Candle, CandleData};
use crate::processor::job::CalculationJob;
use crate::utils::utils::measure_time;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument};

// Worker configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of worker threads; the number of CPUs when unset
    pub concurrency: Option<usize>,
}

impl WorkerConfig {
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }
}

/// Outcome of one job. Exactly one of `values` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResult {
    pub id: String,
    pub indicator: IndicatorKind,
    pub parameters: Value,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<TimedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct Worker {
    config: WorkerConfig,
    defaults: IndicatorDefaults,
}

impl Worker {
    pub fn new(config: WorkerConfig, defaults: IndicatorDefaults) -> Self {
        Self { config, defaults }
    }

    /// Run every job over the same candles. Results come back in job order;
    /// a failing job does not affect the others.
    #[instrument(skip(self, candles, jobs), fields(candles = candles.len(), jobs = jobs.len()))]
    pub fn run(&self, candles: &[Candle], jobs: &[CalculationJob]) -> Result<Vec<JobResult>> {
        let concurrency = self.config.effective_concurrency();
        info!("Starting indicator batch with concurrency limit: {}", concurrency);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("indicator-worker-{}", i))
            .build()
            .context("Failed to build worker thread pool")?;

        let candle_data = CandleData::from_candles(candles);
        let results: Vec<JobResult> =
            pool.install(|| jobs.par_iter().map(|job| self.process_job(&candle_data, job)).collect());

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            "Finished indicator batch: {} succeeded, {} failed",
            results.len() - failed,
            failed
        );

        Ok(results)
    }

    fn process_job(&self, candle_data: &CandleData, job: &CalculationJob) -> JobResult {
        let (outcome, elapsed) = measure_time(&job.cache_key(), || {
            let params = IndicatorParams::from_json(job.indicator, &job.parameters, &self.defaults)?;
            let output = IndicatorCalculator::calculate(candle_data, &params)?;
            Ok::<_, crate::error::IndicatorError>((params, output.to_timed_values(&candle_data.time)))
        });

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        match outcome {
            Ok((params, values)) => {
                info!("Successfully processed indicator {}:{}", job.id, job.indicator);
                JobResult {
                    id: job.id.clone(),
                    indicator: job.indicator,
                    parameters: params.to_json(),
                    elapsed_ms,
                    values: Some(values),
                    error: None,
                }
            }
            Err(e) => {
                error!("Failed to process job {}: {}", job.cache_key(), e);
                JobResult {
                    id: job.id.clone(),
                    indicator: job.indicator,
                    parameters: job.parameters.clone(),
                    elapsed_ms,
                    values: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
