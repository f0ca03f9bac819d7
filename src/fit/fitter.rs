//! Fit orchestration for a single model kind.
//!
//! Given a dataset and a model kind we:
//! - validate the dataset (failures are returned as errors)
//! - linearize it into an OLS problem
//! - solve for coefficients of the standardized feature
//! - expand them to raw powers and back-transform to the model's native form
//! - evaluate fitted points and render the equation
//!
//! Numerical degeneracy after validation is not an error: it yields a
//! `FitResult` with `valid = false` so interactive callers can show it.

use log::{debug, warn};

use crate::domain::{Dataset, FitResult, ModelKind};
use crate::error::ValidationError;
use crate::fit::validate::validate;
use crate::math::solve_least_squares;
use crate::models::{denativize, evaluate, evaluate_standardized, feature_extent, linearize};
use crate::report::{CANNOT_COMPUTE, EquationStyle, compute_quality, format_equation_scaled};

/// Stateless fitting service.
///
/// Holds only presentation settings, so one value can be shared freely or
/// built per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regression {
    style: EquationStyle,
}

impl Regression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: EquationStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &EquationStyle {
        &self.style
    }

    /// Check whether `dataset` can be fitted with `model`.
    pub fn validate(&self, dataset: &Dataset, model: ModelKind) -> Result<(), ValidationError> {
        validate(dataset, model)
    }

    /// Fit `model` to `dataset`.
    pub fn fit(&self, dataset: &Dataset, model: ModelKind) -> Result<FitResult, ValidationError> {
        validate(dataset, model)?;

        let problem = linearize(model, dataset);
        debug!(
            "fitting {model}: {} rows x {} columns",
            problem.matrix.nrows(),
            problem.matrix.ncols()
        );

        let standardized = match solve_least_squares(&problem.matrix, &problem.target) {
            Ok(beta) => beta,
            Err(err) => {
                warn!("{model} fit is degenerate: {err}");
                return Ok(invalid(model, Vec::new()));
            }
        };

        let raw = problem.scaling.expand(standardized.as_slice());
        let coefficients = denativize(model, &raw);
        if coefficients.iter().any(|c| !c.is_finite()) {
            warn!("{model} fit produced non-finite coefficients {coefficients:?}");
            return Ok(invalid(model, coefficients));
        }

        let xs: Vec<f64> = dataset.xs().collect();
        // Raw powers of offset x cancel badly; polynomials are evaluated in
        // the basis they were solved in.
        let fitted_points = match model {
            ModelKind::Polynomial(_) => evaluate_standardized(&problem.scaling, standardized.as_slice(), &xs),
            _ => evaluate(model, &coefficients, &xs),
        };
        if fitted_points.iter().any(|p| !p.y.is_finite()) {
            warn!("{model} fit produced non-finite predictions");
            return Ok(invalid(model, coefficients));
        }

        let extent = feature_extent(model, dataset);
        let equation = format_equation_scaled(model, &coefficients, extent, &self.style);
        let quality = compute_quality(dataset, &fitted_points);
        debug!("{model} fit: y = {equation} (R² = {:.6})", quality.r_squared);

        Ok(FitResult {
            model,
            coefficients,
            equation,
            fitted_points,
            valid: true,
            quality: Some(quality),
        })
    }
}

/// Fit `model` to `dataset` with the default equation style.
pub fn fit(dataset: &Dataset, model: ModelKind) -> Result<FitResult, ValidationError> {
    Regression::default().fit(dataset, model)
}

fn invalid(model: ModelKind, coefficients: Vec<f64>) -> FitResult {
    FitResult {
        model,
        coefficients,
        equation: CANNOT_COMPUTE.to_string(),
        fitted_points: Vec::new(),
        valid: false,
        quality: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_fit_through_proportional_data() {
        let data = Dataset::from_pairs(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let result = fit(&data, ModelKind::Linear).unwrap();
        assert!(result.valid);
        assert_eq!(result.coefficients.len(), 2);
        assert_abs_diff_eq!(result.coefficients[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.coefficients[1], 2.0, epsilon = 1e-9);
        assert_eq!(result.equation, "2·x");
        for (f, o) in result.fitted_points.iter().zip(data.points()) {
            assert_eq!(f.x, o.x);
            assert_abs_diff_eq!(f.y, o.y, epsilon = 1e-9);
        }
        let quality = result.quality.unwrap();
        assert_abs_diff_eq!(quality.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn identical_x_values_give_invalid_result() {
        let data = Dataset::from_pairs(&[(2.0, 1.0), (2.0, 3.0), (2.0, 5.0)]);
        let result = fit(&data, ModelKind::Linear).unwrap();
        assert!(!result.valid);
        assert_eq!(result.equation, CANNOT_COMPUTE);
        assert!(result.fitted_points.is_empty());
        assert!(result.quality.is_none());
    }

    #[test]
    fn repeated_x_values_make_polynomial_singular() {
        // Four rows but only two distinct x values: rank 2 < 3 columns.
        let quad = ModelKind::polynomial(2).unwrap();
        let data = Dataset::from_pairs(&[(1.0, 1.0), (1.0, 2.0), (3.0, 1.0), (3.0, 2.0)]);
        let result = fit(&data, quad).unwrap();
        assert!(!result.valid);
    }

    #[test]
    fn overflowing_exponential_is_invalid_not_an_error() {
        // ln(y) jumps by ~690 per unit of x: the prediction at x = 2 overflows.
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 1e300), (2.0, f64::MAX)]);
        let result = fit(&data, ModelKind::Exponential).unwrap();
        assert!(!result.valid);
        assert_eq!(result.equation, CANNOT_COMPUTE);
        assert_eq!(result.coefficients.len(), 2);
        assert!(result.fitted_points.is_empty());
    }

    #[test]
    fn validation_errors_are_returned() {
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 2.0)]);
        let err = fit(&data, ModelKind::Logarithmic).unwrap_err();
        assert!(matches!(err, ValidationError::DomainViolation { .. }));
    }

    #[test]
    fn style_changes_equation_only() {
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 4.0), (2.0, 7.1)]);
        let coarse = Regression::with_style(EquationStyle::new(2)).fit(&data, ModelKind::Linear).unwrap();
        let fine = Regression::new().fit(&data, ModelKind::Linear).unwrap();
        assert_eq!(coarse.coefficients, fine.coefficients);
        assert_eq!(coarse.fitted_points, fine.fitted_points);
        assert_ne!(coarse.equation, fine.equation);
    }

    #[test]
    fn offset_years_interpolate_exactly() {
        for order in 3..=5u8 {
            let model = ModelKind::polynomial(order).unwrap();
            let data: Dataset = (0..=order)
                .map(|i| (2000.0 + f64::from(i), f64::from(i) * f64::from(i)))
                .collect();
            let result = fit(&data, model).unwrap();
            assert!(result.valid, "order {order}");
            for (f, o) in result.fitted_points.iter().zip(data.points()) {
                assert_abs_diff_eq!(f.y, o.y, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn offset_years_least_squares_stays_valid() {
        for order in 2..=5u8 {
            let model = ModelKind::polynomial(order).unwrap();
            let data: Dataset = (0..usize::from(order) + 4)
                .map(|i| {
                    let i = i as f64;
                    (2000.0 + i, 3.0 + 0.5 * i + (i * 1.7).sin())
                })
                .collect();
            let result = fit(&data, model).unwrap();
            assert!(result.valid, "order {order}");
            assert!(result.quality.unwrap().r_squared > 0.0);
        }
    }

    #[test]
    fn fit_keeps_unsorted_input_order() {
        let data = Dataset::from_pairs(&[(3.0, 9.0), (1.0, 1.0), (2.0, 4.0)]);
        let result = fit(&data, ModelKind::Power).unwrap();
        let xs: Vec<f64> = result.fitted_points.iter().map(|p: &Point| p.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }
}
