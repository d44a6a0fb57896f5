//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - per-run inputs (`ObservationParameters`, `Scenario`, `RunConfig`)
//! - the observing-line choice (`LineChoice`)
//! - pipeline outputs (`DerivedQuantities`, `LineFrequency`)

pub mod types;

pub use types::*;
