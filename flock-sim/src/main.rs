use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_shared::{FlockSettings, SeparationSetting, SnapshotFormat};
use flock_sim::config;
use flock_sim::output;
use flock_sim::{Simulation, WriteFailurePolicy};

#[derive(Parser, Debug)]
#[command(author, version, about = "Flocking simulation with per-step position dumps", long_about = None)]
struct Args {
    /// JSON settings file; missing fields use the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of birds
    #[arg(short, long)]
    birds: Option<usize>,

    /// Number of steps to simulate
    #[arg(short, long)]
    steps: Option<usize>,

    /// Seed for the initial positions and velocities
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    out: Option<String>,

    /// Snapshot layout
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// How the separation force builds its y component
    #[arg(long, value_enum)]
    separation: Option<SeparationArg>,

    /// Log snapshot write failures and keep simulating instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Jsonl,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeparationArg {
    Standard,
    CrossAxis,
}

impl Args {
    fn settings(&self) -> Result<FlockSettings> {
        let mut settings = match &self.config {
            Some(path) => config::load_settings(path)?,
            None => FlockSettings::default(),
        };

        if let Some(birds) = self.birds {
            settings.bird_count = birds;
        }
        if let Some(steps) = self.steps {
            settings.total_steps = steps;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(out) = &self.out {
            settings.output.directory = out.clone();
        }
        if let Some(format) = self.format {
            settings.output.format = match format {
                FormatArg::Csv => SnapshotFormat::Csv,
                FormatArg::Jsonl => SnapshotFormat::Jsonl,
            };
        }
        if let Some(separation) = self.separation {
            settings.separation = match separation {
                SeparationArg::Standard => SeparationSetting::Standard,
                SeparationArg::CrossAxis => SeparationSetting::CrossAxis,
            };
        }

        Ok(settings)
    }
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

    let settings = args.settings().context("Failed to load settings")?;
    log::info!("Output: {} ({:?})", settings.output.directory, settings.output.format);
    if let Some(seed) = settings.seed {
        log::info!("Seed: {}", seed);
    }

    let policy = if args.keep_going {
        WriteFailurePolicy::Skip
    } else {
        WriteFailurePolicy::Abort
    };
    let mut simulation = Simulation::from_settings(&settings)
        .context("Invalid simulation settings")?
        .with_policy(policy);

    let mut writer = output::open_writer(&settings.output, settings.total_steps)
        .context("Failed to open snapshot output")?;

    simulation
        .run(writer.as_mut())
        .context("Simulation failed")?;

    Ok(())
}
