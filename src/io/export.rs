//! Export fitted results.
//!
//! - CSV table of `x, y_original, y_fitted`, easy to open in a spreadsheet
//! - JSON `FitResult` for programmatic consumers

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Dataset, FitResult};
use crate::error::{AppError, EXIT_INPUT};
use crate::report::compute_residuals;

/// Write the results table to a CSV file.
pub fn write_results_csv(path: &Path, dataset: &Dataset, result: &FitResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_results(&mut out, dataset, result)?;
    out.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV: {e}")))
}

/// Write the results table to any writer.
///
/// The first line is a `# function:` comment carrying the equation; fitted
/// values are left empty when the fit is invalid.
pub fn write_results<W: Write>(out: &mut W, dataset: &Dataset, result: &FitResult) -> Result<(), AppError> {
    let err = |e: std::io::Error| AppError::new(EXIT_INPUT, format!("Failed to write export CSV: {e}"));

    writeln!(out, "# function: {}", result.equation).map_err(err)?;
    writeln!(out, "x,y_original,y_fitted").map_err(err)?;
    for r in compute_residuals(dataset, result) {
        writeln!(
            out,
            "{},{},{}",
            r.x,
            r.y_obs,
            r.y_fit.map(|v| v.to_string()).unwrap_or_default()
        )
        .map_err(err)?;
    }
    Ok(())
}

/// Write a `FitResult` as pretty JSON.
pub fn write_result_json(path: &Path, result: &FitResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}
