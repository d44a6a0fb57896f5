//! Photometric time series, one per instrument.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::transit::FitError;

/// Times, fluxes and 1σ flux errors for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photometry {
    pub times: Vec<f64>,
    pub fluxes: Vec<f64>,
    pub flux_errors: Vec<f64>,
}

impl Photometry {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn validate(&self, instrument: &str) -> Result<(), FitError> {
        let invalid = |reason: String| FitError::InvalidData {
            instrument: instrument.to_string(),
            reason,
        };
        if self.is_empty() {
            return Err(invalid("no observations".to_string()));
        }
        if self.fluxes.len() != self.times.len() || self.flux_errors.len() != self.times.len() {
            return Err(invalid(format!(
                "length mismatch: times={}, fluxes={}, flux_errors={}",
                self.times.len(),
                self.fluxes.len(),
                self.flux_errors.len()
            )));
        }
        if let Some(i) = self
            .times
            .iter()
            .zip(&self.fluxes)
            .position(|(t, f)| !(t.is_finite() && f.is_finite()))
        {
            return Err(invalid(format!("non-finite time or flux at row {i}")));
        }
        if let Some(i) = self.flux_errors.iter().position(|e| !(e.is_finite() && *e > 0.0)) {
            return Err(invalid(format!("flux error must be finite and > 0 at row {i}")));
        }
        Ok(())
    }
}

/// Photometry keyed by instrument name.
pub type TimeSeries = BTreeMap<String, Photometry>;

pub fn validate_time_series(data: &TimeSeries) -> Result<(), FitError> {
    if data.is_empty() {
        return Err(FitError::InvalidData {
            instrument: "<none>".to_string(),
            reason: "time series has no instruments".to_string(),
        });
    }
    for (instrument, phot) in data {
        phot.validate(instrument)?;
    }
    Ok(())
}
