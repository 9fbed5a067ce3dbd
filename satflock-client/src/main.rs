use anyhow::{Context, Result};
use clap::Parser;
use satflock_client::{load_settings, Driver};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless satellite flock simulation", long_about = None)]
struct Args {
    /// JSON settings file; missing keys fall back to defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Write every N-th frame
    #[arg(short, long, default_value_t = 1)]
    every: u64,

    /// Override the number of satellites
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Override the RNG seed used for spin rates
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pull followers toward cohesion neighbours when nothing is too close
    #[arg(long)]
    cohesion: bool,

    /// Write frames here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Satellite flock starting...");

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(count) = args.count {
        settings.formation.count = count;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if args.cohesion {
        settings.cohesion = true;
    }

    let mut driver = Driver::new(&settings).context("Failed to initialize simulation")?;
    log::info!(
        "{} satellites, {} ticks, seed {}",
        settings.formation.count,
        args.ticks,
        settings.seed
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = driver
        .run(args.ticks, args.every, &mut out)
        .context("Simulation error")?;

    log::info!(
        "Done: {}",
        serde_json::to_string(&summary).context("Failed to encode summary")?
    );

    Ok(())
}
