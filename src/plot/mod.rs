//! Terminal plots of observed vs fitted values.

pub mod ascii;

pub use ascii::*;
