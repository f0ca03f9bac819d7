//! Shared domain types.
//!
//! These types are kept lightweight and serializable so a host can:
//!
//! - build datasets from whatever it reads (spreadsheet ranges, CSV, ...)
//! - ship `FitResult`s to a renderer as JSON
//! - drive a model selector from a fixed, ordered catalogue

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ModelKindError;

/// One observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Ordered observations, in the order the caller saw them.
///
/// A dataset is never reordered: fitted points come back aligned with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        pairs.iter().copied().collect()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    /// Bounding box of the data, `None` for an empty dataset or non-finite values.
    pub fn stats(&self) -> Option<DatasetStats> {
        let mut stats = DatasetStats {
            n_points: self.points.len(),
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for p in &self.points {
            stats.x_min = stats.x_min.min(p.x);
            stats.x_max = stats.x_max.max(p.x);
            stats.y_min = stats.y_min.min(p.y);
            stats.y_max = stats.y_max.max(p.y);
        }
        let finite = [stats.x_min, stats.x_max, stats.y_min, stats.y_max]
            .iter()
            .all(|v| v.is_finite());
        finite.then_some(stats)
    }
}

impl FromIterator<(f64, f64)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(Point::from).collect(),
        }
    }
}

impl FromIterator<Point> for Dataset {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Summary of the points in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Degree of a polynomial model, always within `2..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PolynomialOrder(u8);

impl PolynomialOrder {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 5;

    pub fn new(order: u8) -> Result<Self, ModelKindError> {
        if (Self::MIN..=Self::MAX).contains(&order) {
            Ok(Self(order))
        } else {
            Err(ModelKindError::OrderOutOfRange(order))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every supported order, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for PolynomialOrder {
    type Error = ModelKindError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PolynomialOrder> for u8 {
    fn from(value: PolynomialOrder) -> Self {
        value.0
    }
}

/// Curve family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `y = a + b·x`
    Linear,
    /// `y = a·e^(b·x)`
    Exponential,
    /// `y = a + b·ln(x)`
    Logarithmic,
    /// `y = a·x^b`
    Power,
    /// `y = a0 + a1·x + … + ak·x^k`
    Polynomial(PolynomialOrder),
}

impl ModelKind {
    /// The fixed-form models, in selector order.
    pub const ALL_SIMPLE: [ModelKind; 4] = [
        ModelKind::Linear,
        ModelKind::Exponential,
        ModelKind::Logarithmic,
        ModelKind::Power,
    ];

    pub fn polynomial(order: u8) -> Result<Self, ModelKindError> {
        Ok(ModelKind::Polynomial(PolynomialOrder::new(order)?))
    }

    /// Every selectable model in display order: the fixed forms, then
    /// polynomials by ascending order.
    pub fn catalogue() -> Vec<ModelKind> {
        Self::ALL_SIMPLE
            .into_iter()
            .chain(PolynomialOrder::all().map(ModelKind::Polynomial))
            .collect()
    }

    /// Resolve a selector key (`"linear"`, `"polynomial"`, ...) plus the
    /// polynomial order. The order is ignored for the fixed forms.
    pub fn from_selector(key: &str, order: u8) -> Result<Self, ModelKindError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(ModelKind::Linear),
            "exponential" => Ok(ModelKind::Exponential),
            "logarithmic" => Ok(ModelKind::Logarithmic),
            "power" => Ok(ModelKind::Power),
            "polynomial" => ModelKind::polynomial(order),
            _ => Err(ModelKindError::UnknownModel(key.to_string())),
        }
    }

    /// Stable selector key.
    pub fn key(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Exponential => "exponential",
            ModelKind::Logarithmic => "logarithmic",
            ModelKind::Power => "power",
            ModelKind::Polynomial(_) => "polynomial",
        }
    }

    /// Human-readable label for selectors.
    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear function ax + b",
            ModelKind::Exponential => "Exponential function ae^bx",
            ModelKind::Logarithmic => "Logarithmic function a + bln(x)",
            ModelKind::Power => "Power function ax^b",
            ModelKind::Polynomial(_) => "Polynomial function a0x^0 ... + anx^n",
        }
    }

    /// Number of fitted coefficients.
    pub fn coefficient_count(self) -> usize {
        match self {
            ModelKind::Polynomial(order) => usize::from(order.get()) + 1,
            _ => 2,
        }
    }

    /// Smallest dataset that can be fitted.
    ///
    /// Polynomials need strictly more points than their order.
    pub fn min_rows(self) -> usize {
        self.coefficient_count()
    }

    /// Sign constraints imposed by the linearizing transform.
    pub fn domain(self) -> Domain {
        match self {
            ModelKind::Linear | ModelKind::Polynomial(_) => Domain::UNRESTRICTED,
            ModelKind::Exponential => Domain {
                x_positive: false,
                y_positive: true,
            },
            ModelKind::Logarithmic => Domain {
                x_positive: true,
                y_positive: false,
            },
            ModelKind::Power => Domain {
                x_positive: true,
                y_positive: true,
            },
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Linear => write!(f, "Linear"),
            ModelKind::Exponential => write!(f, "Exponential"),
            ModelKind::Logarithmic => write!(f, "Logarithmic"),
            ModelKind::Power => write!(f, "Power"),
            ModelKind::Polynomial(order) => write!(f, "Polynomial (order {})", order.get()),
        }
    }
}

/// Sign domain of a model's transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub x_positive: bool,
    pub y_positive: bool,
}

impl Domain {
    pub const UNRESTRICTED: Domain = Domain {
        x_positive: false,
        y_positive: false,
    };

    pub fn admits(&self, p: &Point) -> bool {
        (!self.x_positive || p.x > 0.0) && (!self.y_positive || p.y > 0.0)
    }

    pub fn is_unrestricted(&self) -> bool {
        !self.x_positive && !self.y_positive
    }

    pub fn describe(&self) -> &'static str {
        match (self.x_positive, self.y_positive) {
            (false, false) => "finite values",
            (true, false) => "x > 0",
            (false, true) => "y > 0",
            (true, true) => "x > 0 and y > 0",
        }
    }
}

/// Model family as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Linear,
    Exponential,
    Logarithmic,
    Power,
    Polynomial,
}

impl ModelName {
    /// Combine with the polynomial order flag.
    pub fn to_kind(self, order: u8) -> Result<ModelKind, ModelKindError> {
        match self {
            ModelName::Linear => Ok(ModelKind::Linear),
            ModelName::Exponential => Ok(ModelKind::Exponential),
            ModelName::Logarithmic => Ok(ModelKind::Logarithmic),
            ModelName::Power => Ok(ModelKind::Power),
            ModelName::Polynomial => ModelKind::polynomial(order),
        }
    }
}

/// Goodness of fit, measured in the model's native space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Coefficients in native model space: `[a, b]` for the fixed forms,
/// `[a0, a1, …, ak]` (low to high power) for polynomials.
pub type Coefficients = Vec<f64>;

/// Outcome of one fit call.
///
/// `valid = false` means the data passed validation but the fit is
/// numerically degenerate; `equation` then carries a displayable message and
/// `fitted_points` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelKind,
    pub coefficients: Coefficients,
    pub equation: String,
    pub fitted_points: Vec<Point>,
    pub valid: bool,
    pub quality: Option<FitQuality>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// `None` reads from stdin.
    pub input: Option<PathBuf>,
    pub delimiter: u8,
    pub model: ModelKind,
    pub significant_digits: usize,

    pub table: bool,
    pub json: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
