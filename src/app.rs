//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults and installs the logger
//! - parses CLI arguments
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io::Write;

use clap::Parser;

use crate::cli::{Command, FitArgs, SampleArgs};
use crate::data::{SampleSpec, generate_sample};
use crate::domain::RunConfig;
use crate::error::{AppError, EXIT_INPUT, EXIT_INTERNAL};

pub mod pipeline;

/// Entry point for the `regress` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `regress --model power data.csv`-style invocations behave like `regress fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Models => {
            print!("{}", crate::report::format_catalogue());
            Ok(())
        }
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&run.result)
            .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_run_summary(&run.ingest, &run.result));
    }

    if config.table {
        println!();
        print!("{}", crate::report::format_table(&run.residuals));
    }

    if config.plot {
        println!();
        print!(
            "{}",
            crate::plot::render_fit_plot(&run.ingest.dataset, &run.result, config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.ingest.dataset, &run.result)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_result_json(path, &run.result)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        model: args.model.to_kind(args.order)?,
        coefficients: args.coefficients,
        count: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        seed: args.seed,
    };
    let dataset = generate_sample(&spec)?;

    let err = |e: std::io::Error| AppError::new(EXIT_INPUT, format!("Failed to write sample: {e}"));
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path).map_err(err)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    writeln!(out, "x,y").map_err(err)?;
    for p in dataset.points() {
        writeln!(out, "{},{}", p.x, p.y).map_err(err)?;
    }
    out.flush().map_err(err)
}

pub fn run_config_from_args(args: &FitArgs) -> Result<RunConfig, AppError> {
    Ok(RunConfig {
        input: args.input.clone(),
        delimiter: args.delimiter,
        model: args.model.to_kind(args.order)?,
        significant_digits: args.digits,
        table: args.table,
        json: args.json,
        plot: args.plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

/// Rewrite argv so `regress` defaults to `regress fit`.
///
/// Rules:
/// - `regress`                        -> `regress fit` (reads stdin)
/// - `regress -m power ...`           -> `regress fit -m power ...`
/// - `regress --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "models" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
