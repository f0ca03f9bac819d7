//! Synthetic datasets for trying out fits.

pub mod sample;

pub use sample::*;
