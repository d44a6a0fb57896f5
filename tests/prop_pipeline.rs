//! Property-based tests for the conversion pipeline using proptest.
//!
//! Covers: stage formulas, monotonicity of the gas-mass chain, domain-error
//! boundaries, and run-to-run determinism.

use molgas::cosmology::{CosmologyProvider, FixedDistance, FlatLambdaCdm};
use molgas::domain::ObservationParameters;
use molgas::error::{ConversionError, Stage};
use molgas::physics::constants::{ALMA_BANDS, CO_LINES, SOLAR_LUMINOSITY_ERG_S};
use molgas::physics::conversion::{
    apply_lensing, co_luminosity_10, flux_density, flux_density_integrated, h2_mass,
    infrared_luminosity,
};
use molgas::physics::lines::observed_frequencies;
use molgas::physics::{ConversionPipeline, LinePolicy, PhysicalConstants};
use proptest::prelude::*;

fn co32() -> LinePolicy {
    LinePolicy::Named("CO(3-2)".to_string())
}

// Stage formulas

proptest! {
    /// L_IR is exactly SFR / kappa.
    #[test]
    fn infrared_luminosity_is_ratio(
        sfr in 1e-3f64..1e4,
        kappa in 1e-45f64..1e-42,
    ) {
        let l = infrared_luminosity(sfr, kappa).unwrap();
        let expected = sfr / kappa;
        prop_assert!(((l - expected) / expected).abs() < 1e-9);
    }

    /// Redshifting then un-redshifting recovers the rest frequency.
    #[test]
    fn observed_frequencies_invert(z in 0.0f64..8.0) {
        let observed = observed_frequencies(&CO_LINES, z, &ALMA_BANDS).unwrap();
        prop_assert_eq!(observed.len(), CO_LINES.len());
        for o in observed {
            let rest = o.observed_frequency_ghz * (1.0 + z);
            prop_assert!((rest - o.line.rest_frequency_ghz).abs() < 1e-9);
        }
    }

    /// Integrated flux falls as 1 / D_L².
    #[test]
    fn flux_scales_inverse_square(
        d in 10.0f64..50_000.0,
        k in 1.1f64..10.0,
    ) {
        let near = flux_density_integrated(1e10, 170.0, 1.0, d, 3.25e7).unwrap();
        let far = flux_density_integrated(1e10, 170.0, 1.0, d * k, 3.25e7).unwrap();
        prop_assert!(((near / far) - k * k).abs() / (k * k) < 1e-9);
    }
}

// Monotonicity

proptest! {
    /// M_H2(L'_CO(L_IR)) increases with L_IR.
    #[test]
    fn gas_mass_increases_with_infrared_luminosity(
        log_l_ir in 40.0f64..48.0,
        factor in 1.001f64..100.0,
    ) {
        let alpha = PhysicalConstants::standard().alpha_co;
        let l1 = 10f64.powf(log_l_ir);
        let l2 = l1 * factor;
        let m1 = h2_mass(co_luminosity_10(l1, SOLAR_LUMINOSITY_ERG_S).unwrap(), alpha).unwrap();
        let m2 = h2_mass(co_luminosity_10(l2, SOLAR_LUMINOSITY_ERG_S).unwrap(), alpha).unwrap();
        prop_assert!(m2 > m1);
    }

    /// Planck15 D_L is increasing on z >= 0.
    #[test]
    fn luminosity_distance_is_monotonic(z in 0.0f64..10.0, dz in 0.001f64..1.0) {
        let c = FlatLambdaCdm::planck15();
        let a = c.luminosity_distance(z).unwrap();
        let b = c.luminosity_distance(z + dz).unwrap();
        prop_assert!(b > a);
    }
}

// Domain boundaries

proptest! {
    /// Non-positive magnification, dispersion or distance is a domain error, never NaN.
    #[test]
    fn non_positive_inputs_are_domain_errors(bad in -1e6f64..=0.0) {
        let lens = apply_lensing(1e9, bad).unwrap_err();
        prop_assert_eq!(lens.stage(), Some(Stage::LensedLuminosity));

        let flux = flux_density(1.0, bad).unwrap_err();
        prop_assert_eq!(flux.stage(), Some(Stage::FluxDensity));

        let dist = flux_density_integrated(1e9, 170.0, 1.0, bad, 3.25e7).unwrap_err();
        prop_assert_eq!(dist.stage(), Some(Stage::IntegratedFlux));

        let co = co_luminosity_10(bad, SOLAR_LUMINOSITY_ERG_S).unwrap_err();
        prop_assert_eq!(co.stage(), Some(Stage::Co10Luminosity));
    }

    /// Every pipeline output is either finite or an error.
    #[test]
    fn pipeline_never_returns_non_finite(
        z in -0.99f64..12.0,
        sfr in 0.0f64..5e3,
        mu in -2.0f64..50.0,
        dv in -50.0f64..1000.0,
    ) {
        let cosmo = FixedDistance(5000.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let params = ObservationParameters {
            redshift: z,
            star_formation_rate: sfr,
            lensing_magnification: mu,
            velocity_dispersion: dv,
        };
        match pipeline.run(&params, &co32(), None) {
            Ok(out) => {
                prop_assert!(out.infrared_luminosity.is_finite());
                prop_assert!(out.integrated_flux.is_finite());
                prop_assert!(out.flux_density.is_finite());
                prop_assert!(out.h2_mass.is_finite());
            }
            Err(ConversionError::Domain { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}

// Determinism

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Two runs with identical inputs are bit-identical.
    #[test]
    fn pipeline_is_deterministic(
        z in 0.1f64..6.0,
        sfr in 1.0f64..2e3,
        mu in 1.0f64..30.0,
        dv in 50.0f64..800.0,
    ) {
        let cosmo = FlatLambdaCdm::planck18();
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let params = ObservationParameters {
            redshift: z,
            star_formation_rate: sfr,
            lensing_magnification: mu,
            velocity_dispersion: dv,
        };
        let a = pipeline.run(&params, &co32(), None).unwrap();
        let b = pipeline.run(&params, &co32(), None).unwrap();
        prop_assert_eq!(a.flux_density.to_bits(), b.flux_density.to_bits());
        prop_assert_eq!(a.h2_mass.to_bits(), b.h2_mass.to_bits());
        prop_assert_eq!(a, b);
    }
}
