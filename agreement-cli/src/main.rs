//! Agreement CLI: writes inter-team and inter-annotator agreement metrics
//! for a cleaned annotation table.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use agreement_core::{ConfigOverrides, load_config, pipeline};

/// Generate agreement metrics from cleaned team data.
#[derive(Parser, Debug)]
#[command(name = "agreement", version, about, long_about = None)]
struct Cli {
    /// The cleaned team data in tsv format
    #[arg(short, long)]
    input: PathBuf,

    /// The output directory to store the metrics file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input: Some(self.input.clone()),
            output_dir: self.output.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(cli.log_filter()));
    tracing_subscriber::registry().with(stderr_layer).init();

    let workdir = std::env::current_dir().ok();
    let config = load_config(
        workdir.as_deref(),
        cli.config.as_deref(),
        Some(&cli.overrides()),
    )
    .context("Configuration error")?;

    let summary = pipeline::run(&config).with_context(|| {
        format!(
            "Failed to compute metrics for {}",
            config
                .input
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;

    if !cli.quiet {
        println!(
            "Wrote {} rows ({} MAIN pairs, {} IAA pairs) to {}",
            summary.total_rows,
            summary.main_pairs,
            summary.iaa_pairs,
            summary.output_path.display()
        );
    }
    Ok(())
}
