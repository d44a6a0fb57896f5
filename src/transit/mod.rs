//! Transit light-curve fitting seam.
//!
//! Fitting itself is delegated to whatever implements [`TransitFitter`]; the
//! crate only defines the contract (priors in, best parameters out) plus a
//! small deterministic implementation in [`fitter`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fitter;
pub mod priors;
pub mod series;

pub use fitter::{BoxTransit, PriorSearchFitter};
pub use priors::{Prior, PriorSet};
pub use series::{Photometry, TimeSeries};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("invalid prior for '{name}': {reason}")]
    InvalidPrior { name: String, reason: String },

    #[error("no prior given for required parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid photometry for instrument '{instrument}': {reason}")]
    InvalidData { instrument: String, reason: String },

    #[error("no prior draw produced a finite posterior")]
    NoValidCandidates,
}

/// Best-fit parameters returned by a fitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    pub parameters: BTreeMap<String, f64>,
    pub ln_likelihood: f64,
    pub ln_posterior: f64,
    pub n_evaluations: usize,
}

/// Anything that turns priors plus photometry into posterior parameters.
pub trait TransitFitter {
    fn fit(&self, priors: &PriorSet, data: &TimeSeries) -> Result<Posterior, FitError>;
}
