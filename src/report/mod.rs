//! Reporting utilities: equations, residuals, fit quality and terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

pub mod equation;
pub mod format;

pub use equation::*;
pub use format::*;

use crate::domain::{Dataset, FitQuality, FitResult, Point};

/// Observed vs fitted value at one input point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub x: f64,
    pub y_obs: f64,
    /// `None` when the fit is invalid.
    pub y_fit: Option<f64>,
}

impl Residual {
    pub fn residual(&self) -> Option<f64> {
        self.y_fit.map(|y_fit| self.y_obs - y_fit)
    }
}

/// Pair every observed point with its fitted value, in input order.
pub fn compute_residuals(dataset: &Dataset, fit: &FitResult) -> Vec<Residual> {
    dataset
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| Residual {
            x: p.x,
            y_obs: p.y,
            y_fit: fit.fitted_points.get(i).map(|f| f.y),
        })
        .collect()
}

/// SSE, RMSE and R² of fitted against observed values.
///
/// A dataset with no variance in y has R² = 1 (every model can represent a
/// constant).
pub fn compute_quality(observed: &Dataset, fitted: &[Point]) -> FitQuality {
    let n = observed.len().min(fitted.len());
    let mean = observed.ys().take(n).sum::<f64>() / n.max(1) as f64;

    let mut sse = 0.0;
    let mut sst = 0.0;
    for (o, f) in observed.points().iter().zip(fitted) {
        let r = o.y - f.y;
        sse += r * r;
        let d = o.y - mean;
        sst += d * d;
    }

    let rmse = (sse / n.max(1) as f64).sqrt();
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };
    FitQuality {
        sse,
        rmse,
        r_squared,
        n,
    }
}
