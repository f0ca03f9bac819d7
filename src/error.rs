//! Error types.
//!
//! - `ValidationError`: the dataset cannot be fitted with the requested model.
//!   Returned to the caller before any numeric work happens.
//! - `SolverError`: the linear least-squares problem is degenerate. The fit
//!   orchestrator absorbs this into an invalid `FitResult`.
//! - `ModelKindError`: a model selection could not be turned into a `ModelKind`.
//! - `AppError`: binary-level failure carrying a process exit code.

use crate::domain::ModelKind;

/// Exit code for unreadable input, bad flags and failed writes.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for datasets rejected by the validator.
pub const EXIT_VALIDATION: u8 = 3;
/// Exit code for internal failures.
pub const EXIT_INTERNAL: u8 = 4;

/// Reasons a dataset is not eligible for a model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{rows} point(s) supplied, at least {required} are needed for this model")]
    InsufficientRows { rows: usize, required: usize },

    #[error("{} requires {}; offending points at indices {violating_indices:?}", .model.label(), .model.domain().describe())]
    DomainViolation {
        model: ModelKind,
        violating_indices: Vec<usize>,
    },

    #[error("points must have finite coordinates; offending points at indices {violating_indices:?}")]
    NonFinite { violating_indices: Vec<usize> },
}

/// Failure of the least-squares solve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// The design matrix lacks full column rank, or the solve is not finite.
    #[error("design matrix is singular or the solution is not finite [rows: {rows}, cols: {cols}]")]
    Singular { rows: usize, cols: usize },

    #[error("design matrix has {rows} rows but the target has {targets} entries")]
    DimensionMismatch { rows: usize, targets: usize },
}

/// Invalid model selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelKindError {
    #[error("polynomial order {0} is outside the supported range 2..=5")]
    OrderOutOfRange(u8),

    #[error("unknown model '{0}'")]
    UnknownModel(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(EXIT_VALIDATION, format!("Error: {err}."))
    }
}

impl From<ModelKindError> for AppError {
    fn from(err: ModelKindError) -> Self {
        AppError::new(EXIT_INPUT, format!("Error: {err}."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_violation_names_model_and_rows() {
        let err = ValidationError::DomainViolation {
            model: ModelKind::Logarithmic,
            violating_indices: vec![0, 3],
        };
        let msg = err.to_string();
        assert!(msg.contains("Logarithmic function a + bln(x)"), "{msg}");
        assert!(msg.contains("x > 0"), "{msg}");
        assert!(msg.contains("[0, 3]"), "{msg}");
    }

    #[test]
    fn validation_error_maps_to_validation_exit_code() {
        let err: AppError = ValidationError::InsufficientRows { rows: 1, required: 2 }.into();
        assert_eq!(err.exit_code(), EXIT_VALIDATION);
    }
}
