//! Reporting utilities: formatted terminal output.
//!
//! Formatting lives in one place so the physics code stays free of
//! presentation concerns.

pub mod format;

pub use format::*;
