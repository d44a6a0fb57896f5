//! Observed line frequencies and observing-line selection.
//!
//! The pipeline never decides on its own which transition to observe: it
//! computes `ν_obs` for every line in the table and lets a caller-supplied
//! [`LinePolicy`] pick one.

use serde::Serialize;

use crate::error::{ConversionError, Stage};
use crate::physics::constants::{ReceiverBand, SpectralLine, band_for, line_name_matches};
use crate::physics::conversion::observed_frequency;

/// A line redshifted into the observer frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservedLine {
    pub line: SpectralLine,
    pub observed_frequency_ghz: f64,
    /// Receiver band covering `observed_frequency_ghz`, if any.
    pub band: Option<ReceiverBand>,
}

/// How to choose the observing line from the redshifted table.
#[derive(Debug, Clone, PartialEq)]
pub enum LinePolicy {
    /// Use the named line regardless of where it lands.
    Named(String),
    /// The line inside `band` whose observed frequency is nearest the band center.
    ClosestToBandCenter(ReceiverBand),
    /// The lowest-J line that falls inside any known band.
    LowestInAnyBand,
}

impl LinePolicy {
    pub fn describe(&self) -> String {
        match self {
            LinePolicy::Named(name) => format!("named line {name}"),
            LinePolicy::ClosestToBandCenter(band) => {
                format!("closest to center of {} ({:.1} GHz)", band.label(), band.center_ghz())
            }
            LinePolicy::LowestInAnyBand => "lowest-J line inside any band".to_string(),
        }
    }
}

/// Redshift every line in `lines` (table order is preserved).
pub fn observed_frequencies(
    lines: &[SpectralLine],
    redshift: f64,
    bands: &[ReceiverBand],
) -> Result<Vec<ObservedLine>, ConversionError> {
    lines
        .iter()
        .map(|line| {
            let freq = observed_frequency(line.rest_frequency_ghz, redshift)?;
            Ok(ObservedLine {
                line: *line,
                observed_frequency_ghz: freq,
                band: band_for(bands, freq).copied(),
            })
        })
        .collect()
}

/// Apply `policy` to a set of observed lines.
pub fn select_observing_line(
    observed: &[ObservedLine],
    policy: &LinePolicy,
) -> Result<ObservedLine, ConversionError> {
    let picked = match policy {
        LinePolicy::Named(name) => {
            let found = observed.iter().find(|o| line_name_matches(o.line.name, name));
            if found.is_none() {
                return Err(ConversionError::configuration(
                    format!("line {name}"),
                    "not in the spectral line table",
                ));
            }
            found.copied()
        }
        LinePolicy::ClosestToBandCenter(band) => {
            let center = band.center_ghz();
            observed
                .iter()
                .filter(|o| band.contains(o.observed_frequency_ghz))
                .min_by(|a, b| {
                    let da = (a.observed_frequency_ghz - center).abs();
                    let db = (b.observed_frequency_ghz - center).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .copied()
        }
        LinePolicy::LowestInAnyBand => observed
            .iter()
            .filter(|o| o.band.is_some())
            .min_by_key(|o| o.line.j_upper)
            .copied(),
    };

    picked.ok_or_else(|| {
        ConversionError::domain(
            Stage::LineSelection,
            format!("no line satisfies policy: {}", policy.describe()),
        )
    })
}
