//! Astrophysical conversions.
//!
//! - constants and spectral tables (`constants`)
//! - the closed-form stage functions (`conversion`)
//! - observed frequencies and line selection (`lines`)
//! - the ordered pipeline tying them together (`pipeline`)

pub mod constants;
pub mod conversion;
pub mod lines;
pub mod pipeline;

pub use constants::PhysicalConstants;
pub use lines::{LinePolicy, ObservedLine};
pub use pipeline::ConversionPipeline;
