//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - check a dataset is eligible for the chosen model (`validate`)
//! - run validate -> linearize -> solve -> back-transform -> evaluate -> format (`fitter`)

pub mod fitter;
pub mod validate;

pub use fitter::*;
pub use validate::*;
