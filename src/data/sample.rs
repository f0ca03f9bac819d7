//! Synthetic dataset generation from a known model.
//!
//! x values are evenly spaced over `[x_min, x_max]`; y values are the model
//! prediction plus seeded Gaussian noise. Exponential and power models use
//! multiplicative (log-normal) noise so every y stays positive and the
//! sample remains fittable with the model that produced it.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, ModelKind, Point};
use crate::error::{AppError, EXIT_INPUT, EXIT_INTERNAL};
use crate::models::predict;

/// Parameters of a synthetic sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    pub model: ModelKind,
    pub coefficients: Vec<f64>,
    pub count: usize,
    pub x_min: f64,
    pub x_max: f64,
    /// Standard deviation of the additive noise, or of the log-noise for
    /// exponential and power models.
    pub noise: f64,
    pub seed: u64,
}

pub fn generate_sample(spec: &SampleSpec) -> Result<Dataset, AppError> {
    if spec.count < 2 {
        return Err(AppError::new(EXIT_INPUT, "Sample count must be at least 2."));
    }
    if spec.coefficients.len() != spec.model.coefficient_count() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!(
                "{} needs {} coefficients, got {}.",
                spec.model,
                spec.model.coefficient_count(),
                spec.coefficients.len()
            ),
        ));
    }
    if spec.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(AppError::new(EXIT_INPUT, "Sample coefficients must be finite."));
    }
    if !(spec.x_min.is_finite() && spec.x_max.is_finite() && spec.x_max > spec.x_min) {
        return Err(AppError::new(EXIT_INPUT, "Invalid x range for sample generation."));
    }
    if spec.model.domain().x_positive && spec.x_min <= 0.0 {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("{} samples need x_min > 0.", spec.model),
        ));
    }
    if spec.model.domain().y_positive && spec.coefficients[0] <= 0.0 {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("{} samples need a positive leading coefficient.", spec.model),
        ));
    }
    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(AppError::new(EXIT_INPUT, "Noise must be finite and non-negative."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Noise distribution error: {e}")))?;
    let multiplicative = spec.model.domain().y_positive;

    let mut points = Vec::with_capacity(spec.count);
    for i in 0..spec.count {
        let u = i as f64 / (spec.count as f64 - 1.0);
        let x = spec.x_min + u * (spec.x_max - spec.x_min);
        let y_true = predict(spec.model, x, &spec.coefficients);
        let z: f64 = normal.sample(&mut rng);
        let y = if multiplicative {
            y_true * (spec.noise * z).exp()
        } else {
            y_true + spec.noise * z
        };
        if !y.is_finite() {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Sample value at x={x} is not finite; reduce the x range or coefficients."),
            ));
        }
        points.push(Point::new(x, y));
    }

    Ok(Dataset::new(points))
}
