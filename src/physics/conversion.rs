//! Closed-form conversion stages.
//!
//! Each function is pure and checks its own preconditions. Non-positive values
//! where positivity is required, and non-finite inputs or results, are reported
//! as [`ConversionError::Domain`] tagged with the stage that failed; nothing here
//! lets a NaN or infinity leak through.
//!
//! Units:
//! - luminosities `L_IR`, `L_sun`: erg/s
//! - line luminosities `L'`: K km/s pc²
//! - frequencies: GHz, distances: Mpc, velocities: km/s
//! - `S dV`: Jy km/s, `S`: Jy, `M_H2`: M☉

use crate::error::{ConversionError, Stage};
use crate::physics::constants::{IR_CO_INTERCEPT, IR_CO_SLOPE};

fn finite(stage: Stage, name: &str, value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::domain(stage, format!("{name} must be finite (got {value})")))
    }
}

fn positive(stage: Stage, name: &str, value: f64) -> Result<f64, ConversionError> {
    finite(stage, name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConversionError::domain(stage, format!("{name} must be > 0 (got {value})")))
    }
}

fn checked_result(stage: Stage, value: f64) -> Result<f64, ConversionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConversionError::domain(stage, format!("result is not finite ({value})")))
    }
}

/// `L_IR = SFR / κ`.
pub fn infrared_luminosity(sfr: f64, kappa: f64) -> Result<f64, ConversionError> {
    let stage = Stage::InfraredLuminosity;
    finite(stage, "star formation rate", sfr)?;
    if sfr < 0.0 {
        return Err(ConversionError::domain(
            stage,
            format!("star formation rate must be >= 0 (got {sfr})"),
        ));
    }
    positive(stage, "kappa", kappa)?;
    checked_result(stage, sfr / kappa)
}

/// `L'_CO(1-0)` from `L_IR` using `log L_IR,☉ = 1.13 log L'_CO + 0.53`.
pub fn co_luminosity_10(l_ir: f64, l_sun: f64) -> Result<f64, ConversionError> {
    co_luminosity_10_with(l_ir, l_sun, IR_CO_INTERCEPT, IR_CO_SLOPE)
}

/// [`co_luminosity_10`] with explicit relation coefficients.
pub fn co_luminosity_10_with(
    l_ir: f64,
    l_sun: f64,
    intercept: f64,
    slope: f64,
) -> Result<f64, ConversionError> {
    let stage = Stage::Co10Luminosity;
    positive(stage, "infrared luminosity", l_ir)?;
    positive(stage, "solar luminosity", l_sun)?;
    finite(stage, "relation intercept", intercept)?;
    positive(stage, "relation slope", slope)?;

    let log_l_ir_sun = (l_ir / l_sun).log10();
    let log_l_co = (log_l_ir_sun - intercept) / slope;
    checked_result(stage, 10f64.powf(log_l_co))
}

/// `ν_obs = ν_rest / (1+z)`.
pub fn observed_frequency(rest_ghz: f64, redshift: f64) -> Result<f64, ConversionError> {
    let stage = Stage::ObservedFrequency;
    positive(stage, "rest frequency", rest_ghz)?;
    let one_plus_z = positive(stage, "1+z", 1.0 + finite(stage, "redshift", redshift)?)?;
    checked_result(stage, rest_ghz / one_plus_z)
}

/// `L'_line = L'_CO(1-0) · r`, with `r` the line's luminosity ratio to CO(1-0).
pub fn co_luminosity_line(l_co10: f64, ratio: f64) -> Result<f64, ConversionError> {
    let stage = Stage::LineLuminosity;
    positive(stage, "CO(1-0) luminosity", l_co10)?;
    positive(stage, "line ratio", ratio)?;
    checked_result(stage, l_co10 * ratio)
}

/// `L_lensed = L · μ`.
pub fn apply_lensing(l: f64, magnification: f64) -> Result<f64, ConversionError> {
    let stage = Stage::LensedLuminosity;
    finite(stage, "luminosity", l)?;
    positive(stage, "lensing magnification", magnification)?;
    checked_result(stage, l * magnification)
}

/// `S dV = L' ν_obs² (1+z)³ / (C · D_L²)`.
pub fn flux_density_integrated(
    l_lensed: f64,
    freq_obs_ghz: f64,
    redshift: f64,
    distance_mpc: f64,
    constant: f64,
) -> Result<f64, ConversionError> {
    let stage = Stage::IntegratedFlux;
    finite(stage, "line luminosity", l_lensed)?;
    positive(stage, "observed frequency", freq_obs_ghz)?;
    let one_plus_z = positive(stage, "1+z", 1.0 + finite(stage, "redshift", redshift)?)?;
    positive(stage, "luminosity distance", distance_mpc)?;
    positive(stage, "flux constant", constant)?;

    let value = l_lensed * freq_obs_ghz.powi(2) * one_plus_z.powi(3)
        / (constant * distance_mpc.powi(2));
    checked_result(stage, value)
}

/// `S = S dV / σ_v`.
pub fn flux_density(s_dv: f64, velocity_dispersion: f64) -> Result<f64, ConversionError> {
    let stage = Stage::FluxDensity;
    finite(stage, "integrated flux", s_dv)?;
    positive(stage, "velocity dispersion", velocity_dispersion)?;
    checked_result(stage, s_dv / velocity_dispersion)
}

/// `M_H2 = α_CO · L'_CO(1-0)`.
pub fn h2_mass(l_co10: f64, alpha_co: f64) -> Result<f64, ConversionError> {
    let stage = Stage::H2Mass;
    finite(stage, "CO(1-0) luminosity", l_co10)?;
    if l_co10 < 0.0 {
        return Err(ConversionError::domain(
            stage,
            format!("CO(1-0) luminosity must be >= 0 (got {l_co10})"),
        ));
    }
    positive(stage, "alpha_CO", alpha_co)?;
    checked_result(stage, l_co10 * alpha_co)
}
