//! Linearization, back-transform and evaluation for each model kind.
//!
//! The fitter relies on three primitive operations:
//! - build a design row and target for a given point (for OLS)
//! - map raw OLS coefficients back to the model's native form
//! - predict y(x) from native coefficients (for fitted points and plots)
//!
//! Every model is a polynomial in one feature `u` (`x`, or `ln(x)` for the
//! logarithmic and power models): degree 1 for the fixed forms, `order` for
//! polynomials. Design columns hold powers of the standardized feature
//! `t = (u - center) / scale`, which maps the data onto `[-1, 1]`. Without it
//! raw powers of offset data (years, say) are numerically dependent.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{Dataset, ModelKind, Point};

/// Row count from which rows and predictions are computed in parallel.
///
/// Every row is computed independently, so the parallel and sequential paths
/// produce identical values.
pub const PARALLEL_MIN_ROWS: usize = 4096;

/// A linear least-squares problem: `matrix · β ≈ target`.
///
/// `β` is expressed in powers of the standardized feature; see
/// [`FeatureScaling::expand`].
#[derive(Debug, Clone, PartialEq)]
pub struct DesignProblem {
    pub matrix: DMatrix<f64>,
    pub target: DVector<f64>,
    pub scaling: FeatureScaling,
}

/// Affine change of variable `t = (u - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScaling {
    pub center: f64,
    pub scale: f64,
}

impl FeatureScaling {
    pub const IDENTITY: Self = Self {
        center: 0.0,
        scale: 1.0,
    };

    /// Midrange center and half-range scale of `features`.
    ///
    /// A constant (or empty) feature keeps scale 1, so its standardized
    /// column is exactly zero and the solver reports it as singular.
    pub fn from_features(features: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = features
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), u| (lo.min(u), hi.max(u)));
        if !(lo.is_finite() && hi.is_finite()) {
            return Self::IDENTITY;
        }
        let center = lo + (hi - lo) / 2.0;
        let scale = (hi - lo) / 2.0;
        Self {
            center,
            scale: if scale > 0.0 && scale.is_finite() { scale } else { 1.0 },
        }
    }

    pub fn apply(&self, u: f64) -> f64 {
        (u - self.center) / self.scale
    }

    /// Rewrite `Σ βⱼ·tʲ` as `Σ aᵢ·uⁱ` (binomial expansion of `(u - center)ʲ`).
    pub fn expand(&self, standardized: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; standardized.len()];
        for (j, &beta) in standardized.iter().enumerate() {
            let scaled = beta / self.scale.powi(j as i32);
            // C(j, i), updated in place.
            let mut binomial = 1.0;
            for (i, slot) in out.iter_mut().enumerate().take(j + 1) {
                *slot += scaled * binomial * (-self.center).powi((j - i) as i32);
                binomial = binomial * (j - i) as f64 / (i + 1) as f64;
            }
        }
        out
    }

    /// Horner evaluation of `Σ βⱼ·tʲ` at `t = apply(u)`.
    pub fn evaluate(&self, standardized: &[f64], u: f64) -> f64 {
        let t = self.apply(u);
        standardized.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }
}

/// The single variable each model is polynomial in.
pub fn feature(model: ModelKind, x: f64) -> f64 {
    match model {
        ModelKind::Logarithmic | ModelKind::Power => x.ln(),
        ModelKind::Linear | ModelKind::Exponential | ModelKind::Polynomial(_) => x,
    }
}

/// Largest `|feature(x)|` over the dataset, i.e. the reach of each power term.
pub fn feature_extent(model: ModelKind, dataset: &Dataset) -> f64 {
    dataset.xs().map(|x| feature(model, x).abs()).fold(0.0, f64::max)
}

/// Fill an unstandardized design row for the given model kind.
///
/// The row includes the constant term first (intercept).
///
/// # Panics
/// Panics if `out` is shorter than `model.coefficient_count()`.
pub fn fill_design_row(model: ModelKind, x: f64, out: &mut [f64]) {
    fill_powers(feature(model, x), &mut out[..model.coefficient_count()]);
}

fn fill_powers(t: f64, out: &mut [f64]) {
    let mut power = 1.0;
    for slot in out.iter_mut() {
        *slot = power;
        power *= t;
    }
}

/// Map an observed y into the space the model is linear in.
pub fn transform_target(model: ModelKind, y: f64) -> f64 {
    match model {
        ModelKind::Exponential | ModelKind::Power => y.ln(),
        ModelKind::Linear | ModelKind::Logarithmic | ModelKind::Polynomial(_) => y,
    }
}

/// Build the linear least-squares problem for `dataset`.
///
/// Callers are expected to have validated the dataset against the model's
/// domain; out-of-domain points produce NaN entries.
pub fn linearize(model: ModelKind, dataset: &Dataset) -> DesignProblem {
    let n = dataset.len();
    let m = model.coefficient_count();
    let points = dataset.points();

    let scaling = FeatureScaling::from_features(points.iter().map(|p| feature(model, p.x)));

    let mut rows = vec![0.0; n * m];
    let mut target = vec![0.0; n];

    if n >= PARALLEL_MIN_ROWS {
        rows.par_chunks_mut(m)
            .zip(target.par_iter_mut())
            .zip(points.par_iter())
            .for_each(|item| fill_row(model, &scaling, item));
    } else {
        rows.chunks_mut(m)
            .zip(target.iter_mut())
            .zip(points.iter())
            .for_each(|item| fill_row(model, &scaling, item));
    }

    DesignProblem {
        matrix: DMatrix::from_row_slice(n, m, &rows),
        target: DVector::from_vec(target),
        scaling,
    }
}

fn fill_row(model: ModelKind, scaling: &FeatureScaling, ((row, target), point): ((&mut [f64], &mut f64), &Point)) {
    fill_powers(scaling.apply(feature(model, point.x)), row);
    *target = transform_target(model, point.y);
}

/// Turn raw OLS coefficients into native model coefficients.
///
/// Exponential and power fits solve for `ln(a)`; everything else is used as is.
pub fn denativize(model: ModelKind, raw: &[f64]) -> Vec<f64> {
    match model {
        ModelKind::Exponential | ModelKind::Power => {
            let mut out = raw.to_vec();
            if let Some(intercept) = out.first_mut() {
                *intercept = intercept.exp();
            }
            out
        }
        ModelKind::Linear | ModelKind::Logarithmic | ModelKind::Polynomial(_) => raw.to_vec(),
    }
}

/// Predict `y(x)` for the given model kind from native coefficients.
///
/// Returns NaN when `coefficients` does not hold `model.coefficient_count()`
/// values.
pub fn predict(model: ModelKind, x: f64, coefficients: &[f64]) -> f64 {
    if coefficients.len() != model.coefficient_count() {
        return f64::NAN;
    }
    match model {
        ModelKind::Linear => coefficients[0] + coefficients[1] * x,
        ModelKind::Exponential => coefficients[0] * (coefficients[1] * x).exp(),
        ModelKind::Logarithmic => coefficients[0] + coefficients[1] * x.ln(),
        ModelKind::Power => coefficients[0] * x.powf(coefficients[1]),
        // Horner, highest power first.
        ModelKind::Polynomial(_) => coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c),
    }
}

/// Fitted points at `xs`, in the same order.
pub fn evaluate(model: ModelKind, coefficients: &[f64], xs: &[f64]) -> Vec<Point> {
    let at = |&x: &f64| Point::new(x, predict(model, x, coefficients));
    if xs.len() >= PARALLEL_MIN_ROWS {
        xs.par_iter().map(at).collect()
    } else {
        xs.iter().map(at).collect()
    }
}

/// Fitted points of a polynomial from its standardized coefficients.
///
/// Same polynomial as the expanded coefficients, but Horner runs on `t` in
/// `[-1, 1]`, so offset data keeps full precision.
pub fn evaluate_standardized(scaling: &FeatureScaling, standardized: &[f64], xs: &[f64]) -> Vec<Point> {
    let at = |&x: &f64| Point::new(x, scaling.evaluate(standardized, x));
    if xs.len() >= PARALLEL_MIN_ROWS {
        xs.par_iter().map(at).collect()
    } else {
        xs.iter().map(at).collect()
    }
}
