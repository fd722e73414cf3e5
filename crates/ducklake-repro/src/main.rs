//! DuckLake reproduction binary.
//!
//! Connects, loads the fixture rows, runs the probe query before and after
//! flushing inlined data, and prints the rows it got back.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ducklake_repro::cli::Cli;
use ducklake_repro::{OutputFormat, Scenario};

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing on stderr so stdout carries only the scenario output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ducklake_repro=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Cli::parse().into_config();
    tracing::info!(
        s3_endpoint = %config.secret.endpoint,
        data_path = %config.catalog.data_path,
        repeat_flush = config.repeat_flush,
        "Starting reproduction"
    );

    let format = config.format;
    let report = match format {
        OutputFormat::Text => Scenario::new(config, io::stdout().lock())
            .run()
            .context("Reproduction failed")?,
        OutputFormat::Json => {
            let report = Scenario::new(config, io::sink())
                .run()
                .context("Reproduction failed")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
            report
        }
    };

    if report.bug_observed {
        tracing::warn!("Probe returned rows outside the filter");
    }
    Ok(())
}
