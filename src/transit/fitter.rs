//! Reference transit fitter.
//!
//! [`PriorSearchFitter`] draws parameter sets from the priors with a seeded
//! RNG, scores each against a box-shaped transit model, and returns the draw
//! with the highest log posterior. It is a deterministic stand-in for a real
//! sampler: cheap, reproducible, and good enough to exercise the
//! [`TransitFitter`] seam end to end.
//!
//! Box model parameters:
//! - `t0`: mid-transit time of a reference transit
//! - `per`: orbital period
//! - `depth`: fractional flux drop in transit
//! - `duration`: full transit duration
//! - `baseline_<instrument>` (optional): out-of-transit flux level, default 1

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::transit::priors::PriorSet;
use crate::transit::series::{Photometry, TimeSeries, validate_time_series};
use crate::transit::{FitError, Posterior, TransitFitter};

/// Parameters the box model cannot do without.
pub const BOX_PARAMETERS: [&str; 4] = ["t0", "per", "depth", "duration"];

/// Box-shaped transit light curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTransit {
    pub t0: f64,
    pub per: f64,
    pub depth: f64,
    pub duration: f64,
}

impl BoxTransit {
    fn from_params(params: &BTreeMap<String, f64>) -> Option<Self> {
        let model = Self {
            t0: *params.get("t0")?,
            per: *params.get("per")?,
            depth: *params.get("depth")?,
            duration: *params.get("duration")?,
        };
        let ok = model.t0.is_finite()
            && model.per.is_finite()
            && model.per > 0.0
            && model.depth.is_finite()
            && model.duration.is_finite()
            && model.duration > 0.0
            && model.duration < model.per;
        ok.then_some(model)
    }

    pub fn in_transit(&self, t: f64) -> bool {
        let epoch = ((t - self.t0) / self.per).round();
        let offset = t - self.t0 - epoch * self.per;
        offset.abs() <= 0.5 * self.duration
    }

    /// Relative flux at `t` for a unit baseline.
    pub fn flux(&self, t: f64) -> f64 {
        if self.in_transit(t) {
            1.0 - self.depth
        } else {
            1.0
        }
    }
}

/// Gaussian log likelihood (up to a constant) over every instrument.
pub fn ln_likelihood(model: &BoxTransit, params: &BTreeMap<String, f64>, data: &TimeSeries) -> f64 {
    data.iter()
        .map(|(instrument, phot)| {
            let baseline = params
                .get(&format!("baseline_{instrument}"))
                .copied()
                .unwrap_or(1.0);
            chi2(model, baseline, phot) * -0.5
        })
        .sum()
}

fn chi2(model: &BoxTransit, baseline: f64, phot: &Photometry) -> f64 {
    phot.times
        .iter()
        .zip(&phot.fluxes)
        .zip(&phot.flux_errors)
        .map(|((&t, &f), &e)| {
            let r = (f - baseline * model.flux(t)) / e;
            r * r
        })
        .sum()
}

/// Seeded random search over prior draws.
#[derive(Debug, Clone)]
pub struct PriorSearchFitter {
    pub draws: usize,
    pub seed: u64,
}

impl Default for PriorSearchFitter {
    fn default() -> Self {
        Self {
            draws: 20_000,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: BTreeMap<String, f64>,
    ln_likelihood: f64,
    ln_posterior: f64,
}

impl TransitFitter for PriorSearchFitter {
    fn fit(&self, priors: &PriorSet, data: &TimeSeries) -> Result<Posterior, FitError> {
        priors.validate()?;
        priors.require(&BOX_PARAMETERS)?;
        validate_time_series(data)?;
        if self.draws == 0 {
            return Err(FitError::NoValidCandidates);
        }

        // Draw sequentially so the candidate set depends only on the seed.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let draws: Vec<BTreeMap<String, f64>> = (0..self.draws)
            .map(|_| priors.sample(&mut rng))
            .collect::<Result<_, _>>()?;

        let candidates: Vec<Candidate> = draws
            .into_par_iter()
            .enumerate()
            .filter_map(|(idx, params)| {
                let model = BoxTransit::from_params(&params)?;
                let ln_like = ln_likelihood(&model, &params, data);
                let ln_post = ln_like + priors.ln_prior(&params);
                ln_post.is_finite().then_some(Candidate {
                    idx,
                    params,
                    ln_likelihood: ln_like,
                    ln_posterior: ln_post,
                })
            })
            .collect();
        debug!(valid = candidates.len(), draws = self.draws, "scored prior draws");

        // Highest posterior wins; ties go to the earliest draw.
        let best = candidates
            .into_iter()
            .reduce(|best, c| {
                if c.ln_posterior > best.ln_posterior
                    || (c.ln_posterior == best.ln_posterior && c.idx < best.idx)
                {
                    c
                } else {
                    best
                }
            })
            .ok_or(FitError::NoValidCandidates)?;

        info!(
            ln_posterior = best.ln_posterior,
            draw = best.idx,
            "transit fit complete"
        );
        Ok(Posterior {
            parameters: best.params,
            ln_likelihood: best.ln_likelihood,
            ln_posterior: best.ln_posterior,
            n_evaluations: self.draws,
        })
    }
}
