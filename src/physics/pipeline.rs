//! The conversion pipeline: SFR → L_IR → L'_CO → line → lensing → flux → M_H2.
//!
//! Stages run in a fixed order and each consumes only earlier outputs and
//! constants. The first failing stage aborts the run; its error names the
//! quantity that could not be computed.

use tracing::debug;

use crate::cosmology::CosmologyProvider;
use crate::domain::{DerivedQuantities, LineFrequency, ObservationParameters};
use crate::error::{ConversionError, Stage};
use crate::physics::constants::{
    ALMA_BANDS, CO_LINES, PhysicalConstants, ReceiverBand, SpectralLine,
};
use crate::physics::conversion::{
    apply_lensing, co_luminosity_10_with, co_luminosity_line, flux_density,
    flux_density_integrated, h2_mass, infrared_luminosity,
};
use crate::physics::lines::{LinePolicy, observed_frequencies, select_observing_line};

/// Pure pipeline over a fixed constant set, line table and distance provider.
pub struct ConversionPipeline<'a> {
    constants: PhysicalConstants,
    lines: &'a [SpectralLine],
    bands: &'a [ReceiverBand],
    cosmology: &'a dyn CosmologyProvider,
}

impl<'a> ConversionPipeline<'a> {
    /// Pipeline over the standard CO table and ALMA bands.
    pub fn new(
        constants: PhysicalConstants,
        cosmology: &'a dyn CosmologyProvider,
    ) -> Result<Self, ConversionError> {
        Self::with_tables(constants, &CO_LINES, &ALMA_BANDS, cosmology)
    }

    /// Pipeline over caller-supplied tables.
    pub fn with_tables(
        constants: PhysicalConstants,
        lines: &'a [SpectralLine],
        bands: &'a [ReceiverBand],
        cosmology: &'a dyn CosmologyProvider,
    ) -> Result<Self, ConversionError> {
        constants.validate()?;
        if lines.is_empty() {
            return Err(ConversionError::configuration("spectral line table", "is empty"));
        }
        if let Some(bad) = lines
            .iter()
            .find(|l| !(l.rest_frequency_ghz.is_finite() && l.rest_frequency_ghz > 0.0))
        {
            return Err(ConversionError::configuration(
                format!("line {}", bad.name),
                format!("rest frequency must be finite and > 0 (got {})", bad.rest_frequency_ghz),
            ));
        }
        Ok(Self {
            constants,
            lines,
            bands,
            cosmology,
        })
    }

    pub fn cosmology_name(&self) -> &str {
        self.cosmology.name()
    }

    /// Run every stage for `params`.
    ///
    /// `ratio_override` replaces the constants' default `L'_line / L'_CO(1-0)`
    /// for the selected line; lines with no default need one.
    pub fn run(
        &self,
        params: &ObservationParameters,
        policy: &LinePolicy,
        ratio_override: Option<f64>,
    ) -> Result<DerivedQuantities, ConversionError> {
        params.validate()?;
        let c = &self.constants;

        let l_ir = infrared_luminosity(params.star_formation_rate, c.kappa)?;
        debug!(l_ir, "infrared luminosity");

        let l_co10 =
            co_luminosity_10_with(l_ir, c.solar_luminosity, c.ir_co_intercept, c.ir_co_slope)?;
        debug!(l_co10, "CO(1-0) luminosity");

        let observed = observed_frequencies(self.lines, params.redshift, self.bands)?;
        let selected = select_observing_line(&observed, policy)?;
        debug!(
            line = selected.line.name,
            freq_ghz = selected.observed_frequency_ghz,
            "selected observing line"
        );

        let ratio = match ratio_override {
            Some(r) => r,
            None => c.default_line_ratio(&selected.line).ok_or_else(|| {
                ConversionError::configuration(
                    format!("line {}", selected.line.name),
                    "no default luminosity ratio to CO(1-0); supply one explicitly",
                )
            })?,
        };
        let l_line = co_luminosity_line(l_co10, ratio)?;
        let l_lensed = apply_lensing(l_line, params.lensing_magnification)?;
        debug!(l_line, l_lensed, ratio, "line luminosity");

        let distance = self.cosmology.luminosity_distance(params.redshift)?;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(ConversionError::domain(
                Stage::LuminosityDistance,
                format!(
                    "{} returned {distance} Mpc at z={}; distance must be > 0",
                    self.cosmology.name(),
                    params.redshift
                ),
            ));
        }

        let s_dv = flux_density_integrated(
            l_lensed,
            selected.observed_frequency_ghz,
            params.redshift,
            distance,
            c.co_flux_constant,
        )?;
        let s = flux_density(s_dv, params.velocity_dispersion)?;
        debug!(distance, s_dv, s, "flux density");

        let m_h2 = h2_mass(l_co10, c.alpha_co)?;
        debug!(m_h2, "molecular gas mass");

        Ok(DerivedQuantities {
            infrared_luminosity: l_ir,
            co10_luminosity: l_co10,
            observed_lines: observed
                .iter()
                .map(|o| LineFrequency {
                    name: o.line.name.to_string(),
                    rest_frequency_ghz: o.line.rest_frequency_ghz,
                    observed_frequency_ghz: o.observed_frequency_ghz,
                    band: o.band.map(|b| b.number),
                })
                .collect(),
            selected_line: selected.line.name.to_string(),
            selected_frequency_ghz: selected.observed_frequency_ghz,
            line_ratio: ratio,
            line_luminosity: l_line,
            lensed_luminosity: l_lensed,
            luminosity_distance_mpc: distance,
            integrated_flux: s_dv,
            flux_density: s,
            h2_mass: m_h2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::{FixedDistance, FlatLambdaCdm};
    use crate::physics::constants::find_band;

    fn reference() -> ObservationParameters {
        ObservationParameters {
            redshift: 1.036,
            star_formation_rate: 30.0,
            lensing_magnification: 4.3,
            velocity_dispersion: 200.0,
        }
    }

    fn co32() -> LinePolicy {
        LinePolicy::Named("CO(3-2)".to_string())
    }

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn reference_scenario_with_planck15() {
        let cosmo = FlatLambdaCdm::planck15();
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let out = pipeline.run(&reference(), &co32(), None).unwrap();

        assert!(rel_close(out.infrared_luminosity, 6.67e44, 1e-3));
        assert!(rel_close(out.co10_luminosity, 3.01e9, 5e-3));
        assert_eq!(out.selected_line, "CO(3-2)");
        assert!((out.selected_frequency_ghz - 169.84).abs() < 0.01);
        assert!(rel_close(out.lensed_luminosity, 7.77e9, 2e-3));
        assert!(rel_close(out.luminosity_distance_mpc, 7094.6, 2e-4));
        assert!(rel_close(out.integrated_flux, 1.1561, 2e-3), "got {}", out.integrated_flux);
        assert!(rel_close(out.flux_density, 5.7807e-3, 2e-3), "got {}", out.flux_density);
        assert_eq!(format!("{:.2}", out.integrated_flux), "1.16");
        assert_eq!(format!("{:.2e}", out.flux_density), "5.78e-3");
        assert!(rel_close(out.h2_mass, 1.204e10, 5e-3));
        assert_eq!(out.observed_lines.len(), CO_LINES.len());
    }

    #[test]
    fn band_policy_matches_named_choice() {
        let cosmo = FixedDistance(7100.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let band = *find_band(&ALMA_BANDS, 5).unwrap();
        let by_band = pipeline
            .run(&reference(), &LinePolicy::ClosestToBandCenter(band), None)
            .unwrap();
        let by_name = pipeline.run(&reference(), &co32(), None).unwrap();
        assert_eq!(by_band, by_name);
    }

    #[test]
    fn runs_are_bit_identical() {
        let cosmo = FlatLambdaCdm::planck18();
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let a = pipeline.run(&reference(), &co32(), None).unwrap();
        let b = pipeline.run(&reference(), &co32(), None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.flux_density.to_bits(), b.flux_density.to_bits());
    }

    #[test]
    fn zero_dispersion_aborts_at_flux_density() {
        let cosmo = FixedDistance(7100.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let params = ObservationParameters { velocity_dispersion: 0.0, ..reference() };
        let err = pipeline.run(&params, &co32(), None).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::FluxDensity));
    }

    #[test]
    fn zero_sfr_aborts_at_co_luminosity() {
        let cosmo = FixedDistance(7100.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let params = ObservationParameters { star_formation_rate: 0.0, ..reference() };
        let err = pipeline.run(&params, &co32(), None).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Co10Luminosity));
    }

    #[test]
    fn zero_distance_is_a_domain_error() {
        let cosmo = crate::cosmology::DistanceFn(|_z: f64| 0.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let err = pipeline.run(&reference(), &co32(), None).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::LuminosityDistance));
    }

    #[test]
    fn line_without_default_ratio_needs_override() {
        let cosmo = FixedDistance(7100.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let policy = LinePolicy::Named("CO(5-4)".to_string());
        let err = pipeline.run(&reference(), &policy, None).unwrap_err();
        assert!(matches!(err, ConversionError::Configuration { .. }));

        let out = pipeline.run(&reference(), &policy, Some(0.4)).unwrap();
        assert_eq!(out.line_ratio, 0.4);
    }

    #[test]
    fn invalid_constants_are_rejected_up_front() {
        let cosmo = FixedDistance(7100.0);
        let constants = PhysicalConstants { kappa: -1.0, ..PhysicalConstants::standard() };
        assert!(ConversionPipeline::new(constants, &cosmo).is_err());
    }

    #[test]
    fn empty_line_table_is_a_configuration_error() {
        let cosmo = FixedDistance(7100.0);
        let result = ConversionPipeline::with_tables(
            PhysicalConstants::standard(),
            &[],
            &ALMA_BANDS,
            &cosmo,
        );
        assert!(matches!(result, Err(ConversionError::Configuration { .. })));
    }
}
