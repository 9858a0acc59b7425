// src/cli.rs
use crate::config::AppConfig;
use crate::indicators::calculator::{available_indicators, IndicatorCalculator, IndicatorKind, IndicatorParams};
use crate::indicators::heikin_ashi::HeikinAshiCalculator;
use crate::models::candle::{load_candles, Candle, CandleData};
use crate::processor::job::load_jobs;
use crate::processor::worker::{Worker, WorkerConfig};
use crate::utils::utils::format_timestamp;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "candle-indicators")]
#[command(about = "Technical indicator calculator for candle data", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./indicators.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute one indicator over a candle file
    Compute {
        /// Candle file ({"candles": [...]} or a bare array)
        #[arg(short, long)]
        input: PathBuf,

        /// Indicator name (e.g., "RSI", "MACD", "BBANDS")
        #[arg(short = 'n', long)]
        indicator: String,

        /// Parameters as a JSON object; missing keys use the defaults
        #[arg(short, long)]
        params: Option<String>,

        /// Write results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute a list of indicator jobs over a candle file
    Batch {
        /// Candle file
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of jobs: [{"id": ..., "indicator": ..., "parameters": {...}}]
        #[arg(short, long)]
        jobs: PathBuf,

        /// Worker threads (overrides the configuration)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Write results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transform a candle file into Heikin-Ashi candles
    HeikinAshi {
        /// Candle file
        #[arg(short, long)]
        input: PathBuf,

        /// Write candles to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available indicators and their default parameters
    List,
}

/// Write pretty JSON to a file, or to stdout.
pub fn write_output<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn parse_params(params: Option<&str>) -> Result<Value> {
    match params {
        Some(s) => serde_json::from_str(s).context("--params must be a JSON object"),
        None => Ok(Value::Null),
    }
}

fn load_input(input: &Path) -> Result<Vec<Candle>> {
    let candles = load_candles(input)?;

    if candles.is_empty() {
        warn!("No candle data available in {}", input.display());
    } else {
        info!(
            "Loaded {} candles from {} to {}",
            candles.len(),
            format_timestamp(candles[0].time),
            format_timestamp(candles[candles.len() - 1].time)
        );
    }

    Ok(candles)
}

/// Execute a command from the CLI
pub fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Compute {
            input,
            indicator,
            params,
            output,
        } => {
            let candle_data = CandleData::from_candles(&load_input(&input)?);
            let kind: IndicatorKind = indicator.parse()?;
            let params = IndicatorParams::from_json(kind, &parse_params(params.as_deref())?, &config.defaults)?;

            let result = IndicatorCalculator::calculate(&candle_data, &params)
                .with_context(|| format!("Failed to calculate indicator {}", kind))?;

            let report = json!({
                "indicator": kind.to_string(),
                "parameters": params.to_json(),
                "values": result.to_timed_values(&candle_data.time),
            });
            write_output(&report, output.as_deref())?;
        }

        Commands::Batch {
            input,
            jobs,
            concurrency,
            output,
        } => {
            let candles = load_input(&input)?;
            let jobs = load_jobs(&jobs)?;

            let worker_config = WorkerConfig {
                concurrency: concurrency.or(config.worker.concurrency),
            };
            let worker = Worker::new(worker_config, config.defaults.clone());
            let results = worker.run(&candles, &jobs)?;

            write_output(&results, output.as_deref())?;

            let failed = results.iter().filter(|r| !r.is_ok()).count();
            if failed > 0 {
                return Err(anyhow::anyhow!("{} of {} jobs failed", failed, results.len()));
            }
        }

        Commands::HeikinAshi { input, output } => {
            let candles = HeikinAshiCalculator::calculate_heikin_ashi(&load_input(&input)?)?;
            write_output(&json!({ "candles": candles }), output.as_deref())?;
        }

        Commands::List => {
            let table = available_indicators(&config.defaults);

            println!("{:<12} | {:<40} | Defaults", "Name", "Description");
            println!("{:-<12}-+-{:-<40}-+-{:-<30}", "", "", "");
            for info in table {
                println!("{:<12} | {:<40} | {}", info.name, info.description, info.parameters);
            }
        }
    }

    Ok(())
}
