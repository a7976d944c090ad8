use anyhow::{Context, Result};
use bgg_api::BggClient;
use clap::Parser;
use colored::Colorize;
use dataset::csv;
use pipeline::run::{self, PipelineConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// bgg-sampler - build a weighted random sample of BoardGameGeek ratings
#[derive(Parser)]
#[command(name = "bgg-sampler")]
#[command(about = "Samples board-game ratings into a flat CSV dataset", long_about = None)]
struct Cli {
    /// Output path for the CSV table
    #[arg(long, default_value = "data/sample.csv")]
    out: PathBuf,

    /// Directory for the two checkpoint snapshots
    #[arg(long, default_value = "data/checkpoints")]
    checkpoint_dir: PathBuf,

    /// Number of top-ranked games forming the sampling population
    #[arg(long, default_value = "2500")]
    top_n: usize,

    /// Number of sample rows to draw
    #[arg(long, default_value = "10000")]
    sample_size: usize,

    /// Games per batch request when fetching rating counts
    #[arg(long, default_value = "50")]
    batch_size: usize,

    /// RNG seed; a fixed seed reproduces the sample exactly
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Courtesy delay between API calls, in milliseconds
    #[arg(long, default_value = "5000")]
    delay_ms: u64,

    /// Retry attempts for transient network failures
    #[arg(long, default_value = "3")]
    max_retries: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = BggClient::new()
        .context("building HTTP client")?
        .with_delay(Duration::from_millis(cli.delay_ms))
        .with_max_retries(cli.max_retries);

    let config = PipelineConfig {
        top_n: cli.top_n,
        sample_size: cli.sample_size,
        batch_size: cli.batch_size,
        seed: cli.seed,
        checkpoint_dir: Some(cli.checkpoint_dir.clone()),
    };

    println!(
        "Sampling {} ratings from the top {} ranked games...",
        cli.sample_size, cli.top_n
    );
    let start = Instant::now();
    let dataset = run::run(&client, &config).await?;
    println!(
        "{} Collected {} rows in {:?}",
        "✓".green(),
        dataset.len(),
        start.elapsed()
    );

    csv::write_dataset(&cli.out, &dataset)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    println!("{} Wrote {}", "✓".green(), cli.out.display());

    Ok(())
}
