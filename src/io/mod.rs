//! Input/output helpers.
//!
//! - scenario and prior JSON loading (`scenario`)
//! - result exports (`export`)

pub mod export;
pub mod scenario;

pub use export::*;
pub use scenario::*;
