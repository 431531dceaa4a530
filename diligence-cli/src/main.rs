//! Diligence CLI: runs the validation and normalization engine on JSON files.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Diligence: claim validation and metrics normalization for technology due diligence
#[derive(Parser, Debug)]
#[command(name = "diligence", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (reads `.diligence/config.toml` from it)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Also write JSON logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Commands {
    /// Extract metrics from one stage document
    Extract {
        /// Analysis stage (e.g. tea-analysis)
        #[arg(long)]
        stage: String,
        /// Stage document (JSON)
        file: PathBuf,
        /// Extract a single metric instead of the core set
        #[arg(long)]
        metric: Option<String>,
    },
    /// Normalize one stage document into a standardized metrics record
    Normalize {
        #[arg(long)]
        stage: String,
        file: PathBuf,
        /// Attach published benchmarks for this technology
        #[arg(long)]
        technology: Option<String>,
    },
    /// Validate claims from a JSON list
    Validate {
        /// JSON array of claim strings, or an object with a `claims` array
        claims: PathBuf,
        /// JSON object of supporting numeric data
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Normalize several stages and validate claims into one summary
    Assess {
        /// Stage documents as STAGE=FILE (repeatable)
        #[arg(long = "stage", value_name = "STAGE=FILE", required = true)]
        stages: Vec<String>,
        #[arg(long)]
        claims: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        technology: Option<String>,
    },
    /// Run a first-principles efficiency model
    Efficiency {
        /// Check a claimed value against the modeled result
        #[arg(long, global = true)]
        claim: Option<f64>,
        #[command(subcommand)]
        model: EfficiencyCommand,
    },
    /// Show published benchmarks (all technologies if none given)
    Benchmarks { technology: Option<String> },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Create a default workspace configuration file
    Init,
    /// Show the effective configuration
    Show,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum EfficiencyCommand {
    /// Heat engine between two reservoirs
    Carnot {
        #[arg(long)]
        hot: f64,
        #[arg(long)]
        cold: f64,
    },
    /// Steam cycle
    Rankine {
        #[arg(long)]
        boiler: f64,
        #[arg(long)]
        condenser: f64,
    },
    /// Gas turbine cycle
    Brayton {
        #[arg(long)]
        pressure_ratio: f64,
        #[arg(long)]
        turbine_inlet: f64,
    },
    /// Single-junction photovoltaic cell
    Solar {
        #[arg(long)]
        bandgap: f64,
        #[arg(long, default_value_t = 1.0)]
        concentration: f64,
    },
    /// Horizontal-axis wind turbine
    Wind {
        #[arg(long)]
        speed: f64,
        #[arg(long)]
        diameter: f64,
    },
    /// Water electrolyzer at a cell voltage
    Electrolyzer {
        #[arg(long)]
        voltage: f64,
    },
    /// Hydrogen fuel cell at a cell voltage
    FuelCell {
        #[arg(long)]
        voltage: f64,
    },
    /// Battery round trip
    Battery {
        #[arg(long)]
        chemistry: String,
    },
    /// Heat pump coefficient of performance
    HeatPump {
        #[arg(long)]
        sink: f64,
        #[arg(long)]
        source: f64,
    },
    /// Pumped hydro round trip
    PumpedHydro {
        #[arg(long)]
        head: f64,
        #[arg(long)]
        penstock_length: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    // Human-readable layer for stderr; stdout carries the JSON output.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let mut _guard = None;
    let json_layer = match &cli.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::daily(log_dir, "diligence.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            _guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| cli.workspace.clone());

    let config = diligence_core::load_config(Some(&workspace), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    config.ensure_valid()?;

    commands::handle_command(cli.command, &workspace, config).await
}
