//! Dataset eligibility checks.
//!
//! Checks run in a fixed order so callers get the most fundamental problem first:
//! 1. enough rows for the model (`n >= 2`, and `n > order` for polynomials)
//! 2. every coordinate finite
//! 3. every point inside the model's sign domain

use crate::domain::{Dataset, ModelKind};
use crate::error::ValidationError;

/// Check whether `dataset` can be fitted with `model`.
pub fn validate(dataset: &Dataset, model: ModelKind) -> Result<(), ValidationError> {
    let rows = dataset.len();
    let required = model.min_rows();
    if rows < required {
        return Err(ValidationError::InsufficientRows { rows, required });
    }

    let non_finite = offending_indices(dataset, |x, y| x.is_finite() && y.is_finite());
    if !non_finite.is_empty() {
        return Err(ValidationError::NonFinite {
            violating_indices: non_finite,
        });
    }

    let domain = model.domain();
    if domain.is_unrestricted() {
        return Ok(());
    }
    let violating = offending_indices(dataset, |x, y| domain.admits(&(x, y).into()));
    if !violating.is_empty() {
        return Err(ValidationError::DomainViolation {
            model,
            violating_indices: violating,
        });
    }

    Ok(())
}

fn offending_indices(dataset: &Dataset, accept: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    dataset
        .points()
        .iter()
        .enumerate()
        .filter(|(_, p)| !accept(p.x, p.y))
        .map(|(i, _)| i)
        .collect()
}
