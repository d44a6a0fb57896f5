//! `molgas` library crate.
//!
//! The binary (`molgas`) is a thin wrapper around this library so that:
//!
//! - the conversion pipeline is testable without spawning processes
//! - cosmology and transit fitting sit behind traits that tests can replace
//! - notebooks or other front-ends can reuse the physics directly

pub mod app;
pub mod cli;
pub mod config;
pub mod cosmology;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod physics;
pub mod report;
pub mod transit;
