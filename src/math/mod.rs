//! Numerical utilities.

pub mod quad;

pub use quad::*;
