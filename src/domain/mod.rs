//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations (`Point`, `Dataset`)
//! - the closed set of curve models (`ModelKind`) and their sign domains
//! - fit outputs (`FitResult`, `FitQuality`) and the run configuration

pub mod types;

pub use types::*;
