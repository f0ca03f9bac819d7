//! Shared "fit pipeline" logic used by the CLI.
//!
//! Keeping this in one place keeps the core workflow free of printing:
//! ingest -> validate -> fit -> residuals
//!
//! The front-end can then focus on presentation.

use crate::domain::{FitResult, RunConfig};
use crate::error::AppError;
use crate::fit::Regression;
use crate::io::ingest::{IngestedData, load_dataset};
use crate::report::{EquationStyle, Residual, compute_residuals};

/// All computed outputs of a single `regress fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub result: FitResult,
    pub residuals: Vec<Residual>,
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Read the two-column dataset.
    let ingest = load_dataset(config.input.as_deref(), config.delimiter)?;

    run_fit_with_data(config, ingest)
}

/// Execute the fitting pipeline on already ingested data.
pub fn run_fit_with_data(config: &RunConfig, ingest: IngestedData) -> Result<RunOutput, AppError> {
    // 2) Validate + fit. Validation failures become exit code 3.
    let regression = Regression::with_style(EquationStyle::new(config.significant_digits));
    let result = regression.fit(&ingest.dataset, config.model)?;

    // 3) Pair observed and fitted values for tables/exports.
    let residuals = compute_residuals(&ingest.dataset, &result);

    Ok(RunOutput {
        ingest,
        result,
        residuals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;
    use crate::error::EXIT_VALIDATION;
    use crate::io::ingest::parse_dataset;

    fn config(model: ModelKind) -> RunConfig {
        RunConfig {
            input: None,
            delimiter: b',',
            model,
            significant_digits: 4,
            table: false,
            json: false,
            plot: false,
            plot_width: 72,
            plot_height: 20,
            export_results: None,
            export_json: None,
        }
    }

    #[test]
    fn pipeline_fits_ingested_rows() {
        let ingest = parse_dataset("x,y\n1,1\n2,4\n3,9\n".as_bytes(), b',').unwrap();
        let out = run_fit_with_data(&config(ModelKind::Power), ingest).unwrap();
        assert!(out.result.valid);
        assert_eq!(out.result.equation, "1·x^2");
        assert_eq!(out.residuals.len(), 3);
    }

    #[test]
    fn domain_violation_maps_to_validation_exit_code() {
        let ingest = parse_dataset("0,1\n1,2\n".as_bytes(), b',').unwrap();
        let err = run_fit_with_data(&config(ModelKind::Logarithmic), ingest).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }
}
