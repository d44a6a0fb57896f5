//! Physical constants and fixed spectral tables.
//!
//! Everything here is static data: created once, never mutated.

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Nominal solar luminosity in erg/s (IAU 2015 B3: 3.828e26 W).
pub const SOLAR_LUMINOSITY_ERG_S: f64 = 3.828e33;

/// Kennicutt (1998) SFR / L_IR factor, in (M☉/yr) per (erg/s).
pub const KENNICUTT_KAPPA: f64 = 4.5e-44;

/// Constant in `L'_CO = 3.25e7 S dV ν_obs^-2 D_L^2 (1+z)^-3`
/// (Solomon & Vanden Bout 2005), with ν in GHz, D_L in Mpc, S dV in Jy km/s.
pub const CO_FLUX_CONSTANT: f64 = 3.25e7;

/// Empirical CO(3-2)/CO(1-0) brightness-temperature luminosity ratio.
pub const CO32_TO_CO10_RATIO: f64 = 0.6;

/// CO-to-H2 conversion factor in M☉ / (K km/s pc²).
pub const ALPHA_CO: f64 = 4.0;

/// Intercept and slope of `log L_IR = slope * log L'_CO + intercept`.
pub const IR_CO_INTERCEPT: f64 = 0.53;
pub const IR_CO_SLOPE: f64 = 1.13;

/// The set of constants the conversion pipeline reads.
///
/// Serializable so a scenario file can override individual entries; any
/// entry not given falls back to [`PhysicalConstants::standard`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    pub kappa: f64,
    pub solar_luminosity: f64,
    pub co_flux_constant: f64,
    pub co32_to_co10_ratio: f64,
    pub alpha_co: f64,
    pub ir_co_intercept: f64,
    pub ir_co_slope: f64,
}

impl PhysicalConstants {
    pub const fn standard() -> Self {
        Self {
            kappa: KENNICUTT_KAPPA,
            solar_luminosity: SOLAR_LUMINOSITY_ERG_S,
            co_flux_constant: CO_FLUX_CONSTANT,
            co32_to_co10_ratio: CO32_TO_CO10_RATIO,
            alpha_co: ALPHA_CO,
            ir_co_intercept: IR_CO_INTERCEPT,
            ir_co_slope: IR_CO_SLOPE,
        }
    }

    /// Reject non-finite or non-positive entries.
    ///
    /// The intercept is the only entry allowed to be zero or negative.
    pub fn validate(&self) -> Result<(), ConversionError> {
        let positive = [
            ("kappa", self.kappa),
            ("solar_luminosity", self.solar_luminosity),
            ("co_flux_constant", self.co_flux_constant),
            ("co32_to_co10_ratio", self.co32_to_co10_ratio),
            ("alpha_co", self.alpha_co),
            ("ir_co_slope", self.ir_co_slope),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConversionError::configuration(
                    name,
                    format!("must be finite and > 0 (got {value})"),
                ));
            }
        }
        if !self.ir_co_intercept.is_finite() {
            return Err(ConversionError::configuration(
                "ir_co_intercept",
                format!("must be finite (got {})", self.ir_co_intercept),
            ));
        }
        Ok(())
    }

    /// Default luminosity ratio `L'_line / L'_CO(1-0)` for a line, if known.
    pub fn default_line_ratio(&self, line: &SpectralLine) -> Option<f64> {
        match line.j_upper {
            1 => Some(1.0),
            3 => Some(self.co32_to_co10_ratio),
            _ => None,
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::standard()
    }
}

/// A rotational transition with its rest-frame frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralLine {
    pub name: &'static str,
    /// Upper rotational level `J` of the `J → J-1` transition.
    pub j_upper: u8,
    pub rest_frequency_ghz: f64,
}

/// Known CO rotational transitions, ordered by `J`.
#[rustfmt::skip]
pub const CO_LINES: [SpectralLine; 7] = [
    SpectralLine { name: "CO(1-0)", j_upper: 1, rest_frequency_ghz: 115.271_201_8 },
    SpectralLine { name: "CO(2-1)", j_upper: 2, rest_frequency_ghz: 230.538_000_0 },
    SpectralLine { name: "CO(3-2)", j_upper: 3, rest_frequency_ghz: 345.795_989_9 },
    SpectralLine { name: "CO(4-3)", j_upper: 4, rest_frequency_ghz: 461.040_768_2 },
    SpectralLine { name: "CO(5-4)", j_upper: 5, rest_frequency_ghz: 576.267_930_5 },
    SpectralLine { name: "CO(6-5)", j_upper: 6, rest_frequency_ghz: 691.473_076_3 },
    SpectralLine { name: "CO(7-6)", j_upper: 7, rest_frequency_ghz: 806.651_806_0 },
];

/// Look up a line by name, ignoring case and whitespace (`"co 3-2"` works).
pub fn find_line<'a>(lines: &'a [SpectralLine], name: &str) -> Option<&'a SpectralLine> {
    lines.iter().find(|l| line_name_matches(l.name, name))
}

pub fn line_name_matches(a: &str, b: &str) -> bool {
    normalize_line_name(a) == normalize_line_name(b)
}

fn normalize_line_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A receiver frequency window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReceiverBand {
    pub number: u8,
    pub low_ghz: f64,
    pub high_ghz: f64,
}

impl ReceiverBand {
    pub fn center_ghz(&self) -> f64 {
        0.5 * (self.low_ghz + self.high_ghz)
    }

    pub fn contains(&self, freq_ghz: f64) -> bool {
        freq_ghz >= self.low_ghz && freq_ghz <= self.high_ghz
    }

    pub fn label(&self) -> String {
        format!("ALMA Band {}", self.number)
    }
}

/// ALMA receiver bands (nominal RF coverage, GHz).
///
/// Band 2 is omitted: its range overlaps Band 3.
#[rustfmt::skip]
pub const ALMA_BANDS: [ReceiverBand; 9] = [
    ReceiverBand { number: 1, low_ghz: 35.0, high_ghz: 50.0 },
    ReceiverBand { number: 3, low_ghz: 84.0, high_ghz: 116.0 },
    ReceiverBand { number: 4, low_ghz: 125.0, high_ghz: 163.0 },
    ReceiverBand { number: 5, low_ghz: 163.0, high_ghz: 211.0 },
    ReceiverBand { number: 6, low_ghz: 211.0, high_ghz: 275.0 },
    ReceiverBand { number: 7, low_ghz: 275.0, high_ghz: 373.0 },
    ReceiverBand { number: 8, low_ghz: 385.0, high_ghz: 500.0 },
    ReceiverBand { number: 9, low_ghz: 602.0, high_ghz: 720.0 },
    ReceiverBand { number: 10, low_ghz: 787.0, high_ghz: 950.0 },
];

pub fn find_band(bands: &[ReceiverBand], number: u8) -> Option<&ReceiverBand> {
    bands.iter().find(|b| b.number == number)
}

/// First band containing `freq_ghz`, if any.
pub fn band_for(bands: &[ReceiverBand], freq_ghz: f64) -> Option<&ReceiverBand> {
    bands.iter().find(|b| b.contains(freq_ghz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_constants_validate() {
        PhysicalConstants::standard().validate().unwrap();
    }

    #[test]
    fn zero_alpha_co_is_a_configuration_error() {
        let c = PhysicalConstants {
            alpha_co: 0.0,
            ..PhysicalConstants::standard()
        };
        let err = c.validate().unwrap_err();
        assert!(matches!(
            err,
            ConversionError::Configuration { ref what, .. } if what == "alpha_co"
        ));
    }

    #[test]
    fn nan_intercept_is_rejected() {
        let c = PhysicalConstants {
            ir_co_intercept: f64::NAN,
            ..PhysicalConstants::standard()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn line_table_is_ordered_by_j() {
        for pair in CO_LINES.windows(2) {
            assert!(pair[0].j_upper < pair[1].j_upper);
            assert!(pair[0].rest_frequency_ghz < pair[1].rest_frequency_ghz);
        }
    }

    #[test]
    fn find_line_is_lenient() {
        assert_eq!(find_line(&CO_LINES, "co(3-2)").unwrap().j_upper, 3);
        assert_eq!(find_line(&CO_LINES, "CO 2-1").unwrap().j_upper, 2);
        assert!(find_line(&CO_LINES, "HCN(1-0)").is_none());
    }

    #[test]
    fn default_ratios() {
        let c = PhysicalConstants::standard();
        assert_eq!(c.default_line_ratio(&CO_LINES[0]), Some(1.0));
        assert_eq!(c.default_line_ratio(&CO_LINES[2]), Some(0.6));
        assert_eq!(c.default_line_ratio(&CO_LINES[4]), None);
    }

    #[test]
    fn band_lookup() {
        let b5 = find_band(&ALMA_BANDS, 5).unwrap();
        assert!((b5.center_ghz() - 187.0).abs() < 1e-12);
        assert_eq!(band_for(&ALMA_BANDS, 169.84).unwrap().number, 5);
        assert!(band_for(&ALMA_BANDS, 56.6).is_none());
    }
}
