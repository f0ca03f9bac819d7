//! Least squares solver.
//!
//! Every model is reduced to the same problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - Columns are scaled to unit norm before the decomposition so polynomial
//!   columns (`x^0 … x^5`) do not swamp each other, then β is unscaled.
//! - We use SVD rather than normal equations. It handles tall matrices and
//!   exposes the singular values, which is how rank deficiency is detected.
//! - Rank deficiency uses the usual numerical-rank cutoff
//!   `max(rows, cols) · ε · σ_max`. A rank-deficient system is an error, never
//!   a minimum-norm "solution". Callers keep columns well conditioned (see
//!   `models::FeatureScaling`), so only genuinely dependent columns trip it.

use nalgebra::{DMatrix, DVector};

use crate::error::SolverError;

/// Solve a least squares problem using SVD.
///
/// Returns `SolverError::Singular` when there are fewer rows than columns, the
/// columns are linearly dependent, or the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
    let (rows, cols) = x.shape();
    if y.len() != rows {
        return Err(SolverError::DimensionMismatch {
            rows,
            targets: y.len(),
        });
    }
    let singular = SolverError::Singular { rows, cols };
    if cols == 0 || rows < cols {
        return Err(singular);
    }

    let norms: Vec<f64> = x.column_iter().map(|c| c.norm()).collect();
    if norms.iter().any(|n| !(n.is_finite() && *n > 0.0)) {
        return Err(singular);
    }

    let mut scaled = x.clone();
    for (mut col, norm) in scaled.column_iter_mut().zip(&norms) {
        col /= *norm;
    }

    let svd = scaled.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let sigma_min = svd.singular_values.min();
    let tol = rows.max(cols) as f64 * f64::EPSILON * sigma_max;
    if !(sigma_max.is_finite() && sigma_max > 0.0) || sigma_min <= tol {
        return Err(singular);
    }

    let mut beta = svd.solve(y, tol).map_err(|_| singular.clone())?;
    for (b, norm) in beta.iter_mut().zip(&norms) {
        *b /= *norm;
    }

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(singular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn least_squares_minimizes_residual_on_noisy_data() {
        // Mean of y is the least-squares intercept for a constant model.
        let x = DMatrix::from_element(4, 1, 1.0);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 6.0]);
        let beta = solve_least_squares(&x, &y).unwrap();
        assert_abs_diff_eq!(beta[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn identical_columns_are_singular() {
        // All x identical: [1, x] columns are proportional.
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 4.0, 1.0, 4.0, 1.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            solve_least_squares(&x, &y),
            Err(SolverError::Singular { rows: 3, cols: 2 })
        );
    }

    #[test]
    fn more_columns_than_rows_is_singular() {
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 1.0, 1.0, 2.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(
            solve_least_squares(&x, &y),
            Err(SolverError::Singular { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn zero_column_is_singular() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_err());
    }

    #[test]
    fn mismatched_target_is_rejected() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            solve_least_squares(&x, &y),
            Err(SolverError::DimensionMismatch { rows: 2, targets: 3 })
        );
    }

    #[test]
    fn standardized_quintic_on_offset_years_is_full_rank() {
        // x = 2000..=2005 mapped onto [-1, 1].
        let ts: Vec<f64> = (0..6).map(|i| (f64::from(i) - 2.5) / 2.5).collect();
        let mut data = Vec::new();
        for &t in &ts {
            for j in 0..6 {
                data.push(f64::powi(t, j));
            }
        }
        let x = DMatrix::from_row_slice(6, 6, &data);
        let y = DVector::from_iterator(6, (0..6).map(|i| f64::from(i * i)));
        let beta = solve_least_squares(&x, &y).unwrap();
        let fitted = &x * &beta;
        for (f, o) in fitted.iter().zip(y.iter()) {
            assert_abs_diff_eq!(*f, *o, epsilon = 1e-10);
        }
    }

    #[test]
    fn quintic_interpolation_is_accurate() {
        // y = 1 - x + 0.5x^5 sampled at six distinct points.
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let mut data = Vec::new();
        for &x in &xs {
            for j in 0..6 {
                data.push(f64::powi(x, j));
            }
        }
        let x = DMatrix::from_row_slice(6, 6, &data);
        let y = DVector::from_iterator(6, xs.iter().map(|&x| 1.0 - x + 0.5 * f64::powi(x, 5)));
        let beta = solve_least_squares(&x, &y).unwrap();
        let expected = [1.0, -1.0, 0.0, 0.0, 0.0, 0.5];
        for (b, e) in beta.iter().zip(expected) {
            assert_abs_diff_eq!(*b, e, epsilon = 1e-8);
        }
    }
}
