//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - loaded from a scenario JSON file
//! - passed through the conversion pipeline
//! - exported to JSON alongside the run metadata

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cosmology::CosmologyKind;
use crate::error::{ConversionError, Stage};
use crate::physics::PhysicalConstants;

/// Per-galaxy inputs for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationParameters {
    pub redshift: f64,
    /// Star formation rate in M☉/yr.
    pub star_formation_rate: f64,
    pub lensing_magnification: f64,
    /// Line velocity width in km/s.
    pub velocity_dispersion: f64,
}

impl ObservationParameters {
    /// Check the run-level invariants: all finite, `z > -1`, `SFR >= 0`.
    ///
    /// Stage-specific positivity (magnification, dispersion) is left to the
    /// stages themselves so the error names the right quantity.
    pub fn validate(&self) -> Result<(), ConversionError> {
        let fields = [
            ("redshift", self.redshift, Stage::ObservedFrequency),
            ("star_formation_rate", self.star_formation_rate, Stage::InfraredLuminosity),
            ("lensing_magnification", self.lensing_magnification, Stage::LensedLuminosity),
            ("velocity_dispersion", self.velocity_dispersion, Stage::FluxDensity),
        ];
        for (name, value, stage) in fields {
            if !value.is_finite() {
                return Err(ConversionError::domain(
                    stage,
                    format!("{name} must be finite (got {value})"),
                ));
            }
        }
        if self.redshift <= -1.0 {
            return Err(ConversionError::domain(
                Stage::ObservedFrequency,
                format!("redshift must be > -1 (got {})", self.redshift),
            ));
        }
        if self.star_formation_rate < 0.0 {
            return Err(ConversionError::domain(
                Stage::InfraredLuminosity,
                format!("star_formation_rate must be >= 0 (got {})", self.star_formation_rate),
            ));
        }
        Ok(())
    }
}

/// A line's observed frequency as reported in outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFrequency {
    pub name: String,
    pub rest_frequency_ghz: f64,
    pub observed_frequency_ghz: f64,
    /// ALMA band number covering the observed frequency.
    pub band: Option<u8>,
}

/// Everything the pipeline computes, in dependency order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantities {
    /// erg/s
    pub infrared_luminosity: f64,
    /// K km/s pc²
    pub co10_luminosity: f64,
    pub observed_lines: Vec<LineFrequency>,
    pub selected_line: String,
    pub selected_frequency_ghz: f64,
    pub line_ratio: f64,
    /// K km/s pc²
    pub line_luminosity: f64,
    /// K km/s pc²
    pub lensed_luminosity: f64,
    pub luminosity_distance_mpc: f64,
    /// Jy km/s
    pub integrated_flux: f64,
    /// Jy
    pub flux_density: f64,
    /// M☉
    pub h2_mass: f64,
}

/// How the caller wants the observing line chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy", content = "value")]
pub enum LineChoice {
    Named(String),
    Band(u8),
    AnyBand,
}

impl Default for LineChoice {
    fn default() -> Self {
        LineChoice::Named("CO(3-2)".to_string())
    }
}

/// A scenario file: observation parameters plus optional overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub observation: ObservationParameters,
    #[serde(default)]
    pub constants: PhysicalConstants,
    #[serde(default)]
    pub line: Option<LineChoice>,
    #[serde(default)]
    pub line_ratio: Option<f64>,
    #[serde(default)]
    pub cosmology: Option<CosmologyKind>,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from the scenario file (if any), CLI flags and environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub name: Option<String>,
    pub observation: ObservationParameters,
    pub constants: PhysicalConstants,
    pub line: LineChoice,
    /// Overrides the constants' default ratio for the chosen line.
    pub line_ratio: Option<f64>,
    pub cosmology: CosmologyKind,
    /// Bypass the cosmology with a fixed distance (Mpc).
    pub distance_mpc: Option<f64>,
    pub export: Option<PathBuf>,
}
