//! Shared conversion workflow used by the CLI.
//!
//! config -> cosmology provider -> line policy -> pipeline run -> outputs

use tracing::info;

use crate::cosmology::{CosmologyProvider, FixedDistance};
use crate::domain::{DerivedQuantities, LineChoice, RunConfig};
use crate::error::{AppError, EXIT_USAGE};
use crate::physics::constants::{ALMA_BANDS, find_band};
use crate::physics::{ConversionPipeline, LinePolicy};

/// All computed outputs of a single `molgas convert` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub derived: DerivedQuantities,
    pub cosmology: String,
}

/// Translate the configured line choice into a selection policy.
pub fn line_policy(choice: &LineChoice) -> Result<LinePolicy, AppError> {
    match choice {
        LineChoice::Named(name) => Ok(LinePolicy::Named(name.clone())),
        LineChoice::Band(number) => find_band(&ALMA_BANDS, *number)
            .map(|band| LinePolicy::ClosestToBandCenter(*band))
            .ok_or_else(|| AppError::new(EXIT_USAGE, format!("Unknown ALMA band {number}."))),
        LineChoice::AnyBand => Ok(LinePolicy::LowestInAnyBand),
    }
}

/// Execute the conversion pipeline for `config`.
pub fn run_conversion(config: &RunConfig) -> Result<RunOutput, AppError> {
    let cosmology: Box<dyn CosmologyProvider> = match config.distance_mpc {
        Some(d) => Box::new(FixedDistance(d)),
        None => Box::new(config.cosmology.provider()),
    };
    run_conversion_with(config, cosmology.as_ref())
}

/// Execute the conversion pipeline with an injected distance provider.
pub fn run_conversion_with(
    config: &RunConfig,
    cosmology: &dyn CosmologyProvider,
) -> Result<RunOutput, AppError> {
    let policy = line_policy(&config.line)?;
    let pipeline = ConversionPipeline::new(config.constants, cosmology)?;
    let derived = pipeline.run(&config.observation, &policy, config.line_ratio)?;

    info!(
        target_name = config.name.as_deref().unwrap_or("-"),
        cosmology = pipeline.cosmology_name(),
        line = %derived.selected_line,
        h2_mass = derived.h2_mass,
        "conversion complete"
    );

    Ok(RunOutput {
        derived,
        cosmology: pipeline.cosmology_name().to_string(),
    })
}
