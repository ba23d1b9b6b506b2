use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Corella single-pulse shapelet fitter.
#[derive(Parser)]
#[command(
    name = "corella",
    version,
    about = "Bayesian shapelet fitting for pulsar flux time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Fit shapelet and baseline models to a flux time series.
    Fit(FitArgs),
    /// Write a synthetic pulse CSV with known injection parameters.
    Simulate(SimulateArgs),
}

/// Arguments for the `fit` subcommand.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Path to input CSV (columns: time, flux[, flux_err][, pulse_number]).
    pub data: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep only rows with this pulse number.
    #[arg(short, long)]
    pub pulse_number: Option<i64>,

    /// Keep only samples within this fraction of the span around the
    /// midpoint.
    #[arg(long, value_name = "FRACTION")]
    pub truncate_data: Option<f64>,

    /// Shapelet coefficient counts, one per pulse component.
    #[arg(short, long, num_args = 1.., value_name = "N")]
    pub shapelets: Option<Vec<usize>>,

    /// Baseline polynomial degree.
    #[arg(long)]
    pub polynomial_degree: Option<usize>,

    /// Spike mass of the slab-spike coefficient priors.
    #[arg(long)]
    pub mix: Option<f64>,

    /// Lower bound of the pulse-width prior.
    #[arg(long)]
    pub beta_min: Option<f64>,

    /// Upper bound of the pulse-width prior.
    #[arg(long)]
    pub beta_max: Option<f64>,

    /// Use a log-uniform pulse-width prior instead of uniform.
    #[arg(long)]
    pub log_uniform_beta: bool,

    /// Arrival-time prior centre, as a fraction of the observation span.
    #[arg(long, value_name = "FRACTION")]
    pub toa_centre: Option<f64>,

    /// Arrival-time prior width, as a fraction of the observation span.
    #[arg(long, value_name = "FRACTION")]
    pub toa_width: Option<f64>,

    /// Override the number of live points from config.
    #[arg(long)]
    pub n_live: Option<usize>,

    /// Override the RNG seed from config.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override output directory from config.
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Override run label from config.
    #[arg(short, long)]
    pub label: Option<String>,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path for the synthetic CSV.
    #[arg(short, long, default_value = "simulated.csv")]
    pub output: PathBuf,

    /// Number of time samples.
    #[arg(short, long, default_value_t = 200)]
    pub n_samples: usize,

    /// Observation span in time units.
    #[arg(long, default_value_t = 1.0)]
    pub duration: f64,

    /// Injected pulse width.
    #[arg(long, default_value_t = 0.05)]
    pub beta: f64,

    /// Injected arrival time; defaults to the span midpoint.
    #[arg(long)]
    pub toa: Option<f64>,

    /// Injected shapelet coefficients, lowest degree first.
    #[arg(long, num_args = 1.., default_values_t = [1.0])]
    pub coefficients: Vec<f64>,

    /// Constant baseline flux.
    #[arg(long, default_value_t = 0.0)]
    pub baseline: f64,

    /// Gaussian noise amplitude.
    #[arg(long, default_value_t = 0.05)]
    pub sigma: f64,

    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
