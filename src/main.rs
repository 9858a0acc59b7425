// src/main.rs
use anyhow::Result;
use candle_indicators::cli::{execute_command, Cli};
use candle_indicators::config::AppConfig;
use candle_indicators::utils::log_utils::init_tracing;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize environment
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging
    init_tracing(&config.log_level);

    execute_command(cli.command, &config)
}
