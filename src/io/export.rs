//! Export a run's derived quantities to JSON.
//!
//! The export carries the inputs next to the outputs so a result file can be
//! read on its own later.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DerivedQuantities, ObservationParameters};
use crate::error::{AppError, EXIT_USAGE};
use crate::physics::PhysicalConstants;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub name: Option<String>,
    pub cosmology: String,
    pub observation: ObservationParameters,
    pub constants: PhysicalConstants,
    pub derived: DerivedQuantities,
}

/// Write a result JSON file.
pub fn write_results_json(path: &Path, result: &ResultFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_USAGE,
            format!("Failed to create results JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to write results JSON: {e}")))?;
    Ok(())
}

/// Read a result JSON file.
pub fn read_results_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(EXIT_USAGE, format!("Failed to open results JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Invalid results JSON: {e}")))
}
