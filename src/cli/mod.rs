//! Command-line parsing for the curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ModelName;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "regress", version, about = "Least-squares curve fitting for two-column data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model to x/y data and print the best-fit equation.
    Fit(FitArgs),
    /// List the available models.
    Models,
    /// Generate a noisy sample from a known model (CSV on stdout or to a file).
    Sample(SampleArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Two-column input (x, y). Reads stdin when omitted or `-`.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Model family to fit.
    #[arg(short, long, value_enum, default_value_t = ModelName::Linear)]
    pub model: ModelName,

    /// Polynomial order (only used with `--model polynomial`).
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=5))]
    pub order: u8,

    /// Column delimiter (single character; `\t` for tab-separated input).
    #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Significant digits in the printed equation.
    #[arg(long, env = "REGRESS_DIGITS", default_value_t = 4)]
    pub digits: usize,

    /// Print the table of original and fitted values.
    #[arg(long)]
    pub table: bool,

    /// Print the fit result as JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot of the data and fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, env = "REGRESS_PLOT_WIDTH", default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "REGRESS_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,

    /// Export x, original y and fitted y to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fit result to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Model family to sample from.
    #[arg(short, long, value_enum, default_value_t = ModelName::Linear)]
    pub model: ModelName,

    /// Polynomial order (only used with `--model polynomial`).
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=5))]
    pub order: u8,

    /// Native coefficients, comma separated (e.g. `1,2` for y = 1 + 2·x).
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub coefficients: Vec<f64>,

    /// Number of points.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Smallest x value.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub x_min: f64,

    /// Largest x value.
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub x_max: f64,

    /// Noise standard deviation (log-scale for exponential and power models).
    #[arg(long, default_value_t = 0.1)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the sample here instead of stdout.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [b] => Ok(*b),
            _ => Err(format!("delimiter must be a single byte, got '{s}'")),
        },
    }
}
