//! demus - MUS/SAM bank extractor
//!
//! Splits a `.mus` bank and its `.sam` sample file into individual
//! sequences (.msq), wave payloads (.bin/.ads) and text listings.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use demus::{ExtractConfig, Platform, SampleFormat};

#[derive(Parser)]
#[command(name = "demus")]
#[command(about = "Extract sequences and samples from MUS/SAM sound banks")]
#[command(version)]
struct Cli {
    /// Path to the .mus bank
    #[arg(value_name = "MUS_PATH")]
    mus_path: PathBuf,

    /// Path to the matching .sam sample file
    #[arg(value_name = "SAM_PATH")]
    sam_path: PathBuf,

    /// Bank was built for PC, 16-bit PCM samples (default)
    #[arg(short, long, conflicts_with = "console")]
    pc: bool,

    /// Bank was built for console, PS-ADPCM samples
    #[arg(short, long)]
    console: bool,

    /// Output directory (default: bank path without extension)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// How wave payloads are written
    #[arg(long, value_enum, default_value_t = SampleFormat::Raw)]
    format: SampleFormat,

    /// Skip the instrument and loop listings
    #[arg(long)]
    no_listing: bool,

    /// Replace previously extracted sequences and samples
    #[arg(short, long)]
    force: bool,

    /// Log every decoded table
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let platform = if cli.console {
        Platform::Console
    } else {
        Platform::Pc
    };

    let config = ExtractConfig {
        platform,
        output_dir: cli.output,
        sample_format: cli.format,
        write_listing: !cli.no_listing,
        force: cli.force,
    };

    tracing::info!(
        "Extracting {:?} + {:?} ({:?})",
        cli.mus_path,
        cli.sam_path,
        platform
    );
    demus::run(&cli.mus_path, &cli.sam_path, &config)?;
    tracing::info!("Done!");

    Ok(())
}
