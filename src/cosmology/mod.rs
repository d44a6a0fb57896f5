//! Cosmological distances.
//!
//! The conversion pipeline only needs `D_L(z)`, and it takes it through the
//! [`CosmologyProvider`] trait so callers (and tests) can inject whatever model
//! they want. Two providers ship with the crate:
//!
//! - [`FlatLambdaCdm`] with named parameter sets ([`CosmologyKind`])
//! - [`FixedDistance`], which ignores redshift and returns a constant
//!
//! [`DistanceFn`] adapts any closure.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, Stage};
use crate::math::{DEFAULT_PANELS, simpson};
use crate::physics::constants::SPEED_OF_LIGHT_KM_S;

/// Source of luminosity distances.
pub trait CosmologyProvider: Send + Sync {
    /// Short label for reports.
    fn name(&self) -> &str;

    /// Luminosity distance in Mpc at redshift `z`.
    fn luminosity_distance(&self, z: f64) -> Result<f64, ConversionError>;
}

/// Named parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CosmologyKind {
    Planck15,
    Planck18,
    Wmap9,
}

impl CosmologyKind {
    pub fn provider(self) -> FlatLambdaCdm {
        match self {
            CosmologyKind::Planck15 => FlatLambdaCdm::planck15(),
            CosmologyKind::Planck18 => FlatLambdaCdm::planck18(),
            CosmologyKind::Wmap9 => FlatLambdaCdm::wmap9(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s, true).ok()
    }
}

/// Photon density parameter times h² for T_CMB = 2.7255 K.
const OMEGA_GAMMA_H2: f64 = 2.4728e-5;
/// Energy density of one relativistic neutrino species relative to photons.
const NEUTRINO_PER_SPECIES: f64 = 0.2271;
const N_EFF: f64 = 3.046;
const NEUTRINO_SPECIES: f64 = 3.0;
/// `Omega_nu h² = sum(m_nu) / 93.14 eV` for non-relativistic neutrinos.
const NEUTRINO_MASS_EV_PER_OMEGA_H2: f64 = 93.14;

/// Spatially flat ΛCDM with radiation and optional massive neutrinos.
///
/// Massive neutrinos are counted as matter (`(1+z)³`), which holds while they
/// are non-relativistic (`z` up to a few hundred for 0.06 eV).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLambdaCdm {
    pub label: String,
    /// Hubble constant, km/s/Mpc.
    pub h0: f64,
    /// Baryons plus cold dark matter.
    pub omega_m: f64,
    /// Photons plus massless neutrinos.
    pub omega_r: f64,
    /// Massive neutrinos.
    #[serde(default)]
    pub omega_nu: f64,
}

impl FlatLambdaCdm {
    /// Build a model with three massless neutrino species.
    pub fn new(label: impl Into<String>, h0: f64, omega_m: f64) -> Self {
        Self::with_neutrino_mass(label, h0, omega_m, 0.0)
    }

    /// Build a model with one massive species of `m_nu_ev` and two massless
    /// ones (all three massless when `m_nu_ev == 0`).
    pub fn with_neutrino_mass(
        label: impl Into<String>,
        h0: f64,
        omega_m: f64,
        m_nu_ev: f64,
    ) -> Self {
        let h2 = (h0 / 100.0).powi(2);
        let massless = if m_nu_ev > 0.0 { NEUTRINO_SPECIES - 1.0 } else { NEUTRINO_SPECIES };
        let relativistic = NEUTRINO_PER_SPECIES * N_EFF * massless / NEUTRINO_SPECIES;
        Self {
            label: label.into(),
            h0,
            omega_m,
            omega_r: OMEGA_GAMMA_H2 * (1.0 + relativistic) / h2,
            omega_nu: m_nu_ev / NEUTRINO_MASS_EV_PER_OMEGA_H2 / h2,
        }
    }

    /// Planck 2015 (TT,TE,EE+lowP+lensing+ext), one 0.06 eV neutrino.
    pub fn planck15() -> Self {
        Self::with_neutrino_mass("Planck15", 67.74, 0.3075, 0.06)
    }

    /// Planck 2018 (TT,TE,EE+lowE+lensing+BAO), one 0.06 eV neutrino.
    pub fn planck18() -> Self {
        Self::with_neutrino_mass("Planck18", 67.66, 0.30966, 0.06)
    }

    /// WMAP 9-year, massless neutrinos.
    pub fn wmap9() -> Self {
        Self::new("WMAP9", 69.32, 0.2865)
    }

    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_m - self.omega_r - self.omega_nu
    }

    /// Hubble distance `c / H0` in Mpc.
    pub fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT_KM_S / self.h0
    }

    /// Dimensionless expansion rate `E(z) = H(z)/H0`.
    pub fn e_of_z(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        let matter = (self.omega_m + self.omega_nu) * a.powi(3);
        (matter + self.omega_r * a.powi(4) + self.omega_lambda()).sqrt()
    }

    /// Line-of-sight comoving distance in Mpc.
    ///
    /// Integrated in `u = ln(1+z)`, where `dz / E(z) = e^u du / E(e^u - 1)`
    /// stays smooth from `z = 0` into the radiation era.
    pub fn comoving_distance(&self, z: f64) -> Result<f64, ConversionError> {
        self.check(z)?;
        let integrand = |u: f64| u.exp() / self.e_of_z(u.exp_m1());
        let integral = simpson(integrand, 0.0, z.ln_1p(), DEFAULT_PANELS);
        Ok(self.hubble_distance() * integral)
    }

    fn check(&self, z: f64) -> Result<(), ConversionError> {
        let stage = Stage::LuminosityDistance;
        if !(self.h0.is_finite() && self.h0 > 0.0) {
            return Err(ConversionError::configuration(
                format!("cosmology {}", self.label),
                format!("H0 must be finite and > 0 (got {})", self.h0),
            ));
        }
        let densities = [self.omega_m, self.omega_r, self.omega_nu];
        if densities.iter().any(|o| !(o.is_finite() && *o >= 0.0)) || self.omega_lambda() < 0.0 {
            return Err(ConversionError::configuration(
                format!("cosmology {}", self.label),
                format!(
                    "densities must be >= 0 and sum to <= 1 (Omega_m={}, Omega_r={}, Omega_nu={})",
                    self.omega_m, self.omega_r, self.omega_nu
                ),
            ));
        }
        if !z.is_finite() {
            return Err(ConversionError::domain(
                stage,
                format!("redshift must be finite (got {z})"),
            ));
        }
        if z <= -1.0 {
            return Err(ConversionError::domain(
                stage,
                format!("redshift must be > -1 (got {z})"),
            ));
        }
        Ok(())
    }
}

impl CosmologyProvider for FlatLambdaCdm {
    fn name(&self) -> &str {
        &self.label
    }

    fn luminosity_distance(&self, z: f64) -> Result<f64, ConversionError> {
        Ok((1.0 + z) * self.comoving_distance(z)?)
    }
}

/// A provider that returns the same distance for every redshift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDistance(pub f64);

impl CosmologyProvider for FixedDistance {
    fn name(&self) -> &str {
        "fixed"
    }

    fn luminosity_distance(&self, _z: f64) -> Result<f64, ConversionError> {
        if self.0.is_finite() && self.0 > 0.0 {
            Ok(self.0)
        } else {
            Err(ConversionError::domain(
                Stage::LuminosityDistance,
                format!("fixed distance must be finite and > 0 (got {})", self.0),
            ))
        }
    }
}

/// Wraps a plain `D_L(z)` function.
pub struct DistanceFn<F>(pub F);

impl<F> CosmologyProvider for DistanceFn<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn luminosity_distance(&self, z: f64) -> Result<f64, ConversionError> {
        let d = (self.0)(z);
        if d.is_finite() {
            Ok(d)
        } else {
            Err(ConversionError::domain(
                Stage::LuminosityDistance,
                format!("distance function returned {d} at z={z}"),
            ))
        }
    }
}
