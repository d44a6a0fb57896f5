//! Read scenario, prior and photometry JSON files.

use std::fs::File;
use std::path::Path;

use crate::domain::Scenario;
use crate::error::{AppError, EXIT_USAGE};
use crate::transit::series::validate_time_series;
use crate::transit::{PriorSet, TimeSeries};

/// Read a scenario JSON file.
pub fn read_scenario_json(path: &Path) -> Result<Scenario, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(EXIT_USAGE, format!("Failed to open scenario '{}': {e}", path.display()))
    })?;
    let scenario: Scenario = serde_json::from_reader(file)
        .map_err(|e| {
            AppError::new(EXIT_USAGE, format!("Invalid scenario JSON '{}': {e}", path.display()))
        })?;
    Ok(scenario)
}

/// Read and validate a prior set JSON file.
pub fn read_priors_json(path: &Path) -> Result<PriorSet, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(EXIT_USAGE, format!("Failed to open priors '{}': {e}", path.display()))
    })?;
    let priors: PriorSet = serde_json::from_reader(file)
        .map_err(|e| {
            AppError::new(EXIT_USAGE, format!("Invalid priors JSON '{}': {e}", path.display()))
        })?;
    priors.validate()?;
    Ok(priors)
}

/// Read and validate photometry JSON (`instrument -> {times, fluxes, flux_errors}`).
pub fn read_time_series_json(path: &Path) -> Result<TimeSeries, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(EXIT_USAGE, format!("Failed to open photometry '{}': {e}", path.display()))
    })?;
    let data: TimeSeries = serde_json::from_reader(file)
        .map_err(|e| {
            AppError::new(EXIT_USAGE, format!("Invalid photometry JSON '{}': {e}", path.display()))
        })?;
    validate_time_series(&data)?;
    Ok(data)
}
