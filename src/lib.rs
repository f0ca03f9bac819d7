//! `curve-regression` library crate.
//!
//! Fits two-dimensional datasets to one of a closed set of curve models
//! (linear, exponential, logarithmic, power, polynomial of order 2..=5) by
//! linearizing the model and solving an ordinary least-squares problem.
//!
//! ```
//! use curve_regression::{Dataset, ModelKind, fit};
//!
//! let data = Dataset::from_pairs(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
//! let result = fit(&data, ModelKind::Linear).unwrap();
//! assert!(result.valid);
//! assert_eq!(result.equation, "2·x");
//! ```
//!
//! The binary (`regress`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the engine can be embedded by other front-ends (spreadsheets, services)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

pub use domain::{Coefficients, Dataset, FitQuality, FitResult, ModelKind, Point, PolynomialOrder};
pub use error::{ModelKindError, SolverError, ValidationError};
pub use fit::{Regression, fit, validate};
pub use report::{CANNOT_COMPUTE, EquationStyle};
