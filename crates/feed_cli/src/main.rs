use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use feed_core::clock::{TimestampStrategy, DEFAULT_EPOCH_END, DEFAULT_EPOCH_START};
use feed_core::ids::IdScheme;
use feed_core::records::Location;
use feed_core::scenario::{run, DropoffAnchor, GenerationConfig, GenerationMode};
use feed_core::spatial::LocationStrategy;
use feed_core::traffic::HourWindow;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod inspect;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "feedgen",
    about = "Synthetic ride-hailing feed generator",
    long_about = "Generates driver availability events and passenger ride requests,\n\
                  optionally matches them round-robin, and writes JSON and Parquet."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and write drivers/requests as JSON and Parquet
    Generate(GenerateArgs),
    /// Summarize a Parquet artifact written by `generate`
    Inspect {
        /// Parquet file (drivers or passenger requests)
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON config file; flags below override its values
    #[arg(long, env = "FEEDGEN_CONFIG")]
    config: Option<PathBuf>,
    /// Number of drivers in the fleet (matched mode)
    #[arg(long)]
    drivers: Option<usize>,
    /// Number of passenger requests (or paired records)
    #[arg(long)]
    requests: Option<usize>,
    /// Directory receiving the four artifacts
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// City center as LAT,LON
    #[arg(long, value_parser = parse_center)]
    center: Option<Location>,
    /// Sampling radius in km
    #[arg(long)]
    radius_km: Option<f64>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Sample dropoffs around the city center or around the pickup
    #[arg(long, value_enum)]
    dropoff: Option<DropoffArg>,
    /// Rush-hour window such as 7-10; repeat for several windows
    #[arg(long = "rush-hours")]
    rush_hours: Vec<HourWindow>,
    /// Hours added to UTC before bucketing by hour of day
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<i32>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    id_scheme: Option<IdSchemeArg>,
    #[arg(long, value_enum)]
    timestamps: Option<TimestampArg>,
    /// Window start for `--timestamps uniform`, or the day for `hour-weighted`
    #[arg(long, requires = "timestamps", allow_hyphen_values = true)]
    start: Option<i64>,
    /// Window end for `--timestamps uniform`
    #[arg(long, requires = "timestamps", allow_hyphen_values = true)]
    end: Option<i64>,
    /// Probability (0.0–1.0) that a matched ride completes
    #[arg(long)]
    completion_probability: Option<f64>,
    /// Skip round-robin matching in matched mode
    #[arg(long)]
    no_matching: bool,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    UniformDisk,
    Gaussian,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DropoffArg {
    Center,
    Pickup,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Matched,
    Paired,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdSchemeArg {
    Sequential,
    Uuid,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TimestampArg {
    Now,
    Uniform,
    HourWeighted,
}

// ── helpers ────────────────────────────────────────────────────────

fn parse_center(value: &str) -> Result<Location, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("center '{value}' must look like 40.7128,-74.0060"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|error| format!("'{part}' in center '{value}': {error}"))
    };
    Ok(Location::new(parse(lat)?, parse(lon)?))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file (if any) and apply flag overrides on top.
fn build_config(args: &GenerateArgs) -> Result<GenerationConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(drivers) = args.drivers {
        config.num_drivers = drivers;
    }
    if let Some(requests) = args.requests {
        config.num_requests = requests;
    }
    if let Some(dir) = &args.out_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(center) = args.center {
        config.city_center = center;
    }
    if let Some(radius_km) = args.radius_km {
        config.city_radius_km = radius_km;
    }
    if let Some(strategy) = args.strategy {
        config.location_strategy = match strategy {
            StrategyArg::UniformDisk => LocationStrategy::UniformDisk,
            StrategyArg::Gaussian => LocationStrategy::Gaussian,
        };
    }
    if let Some(dropoff) = args.dropoff {
        config.dropoff_anchor = match dropoff {
            DropoffArg::Center => DropoffAnchor::Center,
            DropoffArg::Pickup => DropoffAnchor::Pickup,
        };
    }
    if !args.rush_hours.is_empty() {
        config = config.with_rush_hours(args.rush_hours.clone());
    }
    if let Some(offset) = args.utc_offset {
        config.context.utc_offset_hours = offset;
    }
    if let Some(mode) = args.mode {
        config.mode = match mode {
            ModeArg::Matched => GenerationMode::Matched,
            ModeArg::Paired => GenerationMode::Paired,
        };
    }
    if let Some(scheme) = args.id_scheme {
        config.id_scheme = match scheme {
            IdSchemeArg::Sequential => IdScheme::Sequential,
            IdSchemeArg::Uuid => IdScheme::Uuid,
        };
    }
    if let Some(timestamps) = args.timestamps {
        config.timestamps = match timestamps {
            TimestampArg::Now => TimestampStrategy::Now,
            TimestampArg::Uniform => TimestampStrategy::Uniform {
                start: args.start.unwrap_or(DEFAULT_EPOCH_START),
                end: args.end.unwrap_or(DEFAULT_EPOCH_END),
            },
            TimestampArg::HourWeighted => TimestampStrategy::HourWeighted {
                day_start: args.start.unwrap_or(DEFAULT_EPOCH_START),
            },
        };
    }
    if let Some(probability) = args.completion_probability {
        config.matching.completion_probability = probability;
    }
    if args.no_matching {
        config.matching.enabled = false;
    }
    Ok(config)
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = build_config(&args)?;
    config.validate()?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let dataset = run(&config)?;
    if let Some(summary) = &dataset.match_summary {
        info!(
            matched = summary.matched(),
            completed = summary.completed,
            canceled = summary.canceled,
            unserved = summary.unserved,
            "match summary"
        );
    }
    println!(
        "wrote {} driver events and {} passenger requests",
        dataset.drivers.len(),
        dataset.requests.len()
    );
    Ok(())
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Inspect { path } => inspect::inspect(&path),
    }
}
