//! Prior distributions keyed by parameter name.
//!
//! A prior set is an explicit `name → distribution` map, so a parameter can
//! never be paired with the wrong distribution by position. On disk it is JSON:
//!
//! ```json
//! {
//!   "per":   { "kind": "fixed", "value": 3.0 },
//!   "t0":    { "kind": "normal", "mean": 1.0, "std": 0.05 },
//!   "depth": { "kind": "log_uniform", "low": 1e-4, "high": 0.1 }
//! }
//! ```

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::transit::FitError;

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// A single parameter's prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prior {
    /// Held constant during the fit.
    Fixed { value: f64 },
    Normal { mean: f64, std: f64 },
    Uniform { low: f64, high: f64 },
    /// Uniform in `ln x` over `[low, high]`, `low > 0`.
    LogUniform { low: f64, high: f64 },
}

impl Prior {
    pub fn validate(&self, name: &str) -> Result<(), FitError> {
        let invalid = |reason: String| FitError::InvalidPrior {
            name: name.to_string(),
            reason,
        };
        match *self {
            Prior::Fixed { value } => {
                if !value.is_finite() {
                    return Err(invalid(format!("fixed value must be finite (got {value})")));
                }
            }
            Prior::Normal { mean, std } => {
                if !(mean.is_finite() && std.is_finite() && std > 0.0) {
                    return Err(invalid(format!(
                        "normal needs finite mean and std > 0 (got {mean}, {std})"
                    )));
                }
            }
            Prior::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && high > low) {
                    return Err(invalid(format!("uniform needs low < high (got {low}, {high})")));
                }
            }
            Prior::LogUniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low > 0.0 && high > low) {
                    return Err(invalid(format!(
                        "log-uniform needs 0 < low < high (got {low}, {high})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Whether the fitter varies this parameter.
    pub fn is_free(&self) -> bool {
        !matches!(self, Prior::Fixed { .. })
    }

    /// Normalized log density at `x` (`-inf` outside the support).
    pub fn ln_density(&self, x: f64) -> f64 {
        match *self {
            Prior::Fixed { value } => {
                if x == value {
                    0.0
                } else {
                    f64::NEG_INFINITY
                }
            }
            Prior::Normal { mean, std } => {
                let u = (x - mean) / std;
                -0.5 * u * u - std.ln() - LN_SQRT_2PI
            }
            Prior::Uniform { low, high } => {
                if x >= low && x <= high {
                    -(high - low).ln()
                } else {
                    f64::NEG_INFINITY
                }
            }
            Prior::LogUniform { low, high } => {
                if x >= low && x <= high {
                    -x.ln() - (high / low).ln().ln()
                } else {
                    f64::NEG_INFINITY
                }
            }
        }
    }

    /// Draw one value for parameter `name`, rejecting an invalid prior first.
    pub fn sample<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<f64, FitError> {
        self.validate(name)?;
        match *self {
            Prior::Fixed { value } => Ok(value),
            Prior::Normal { mean, std } => {
                let normal = Normal::new(mean, std).map_err(|e| FitError::InvalidPrior {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(normal.sample(rng))
            }
            Prior::Uniform { low, high } => Ok(rng.gen_range(low..high)),
            Prior::LogUniform { low, high } => {
                let x = rng.gen_range(low.ln()..high.ln()).exp();
                Ok(x.clamp(low, high))
            }
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Prior::Fixed { value } => format!("fixed({value})"),
            Prior::Normal { mean, std } => format!("normal(mean={mean}, std={std})"),
            Prior::Uniform { low, high } => format!("uniform({low}, {high})"),
            Prior::LogUniform { low, high } => format!("log-uniform({low}, {high})"),
        }
    }
}

/// Priors for every fitted parameter, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorSet(BTreeMap<String, Prior>);

impl PriorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, prior: Prior) -> Self {
        self.0.insert(name.into(), prior);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Prior> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prior)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn free_parameters(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, p)| p.is_free()).map(|(k, _)| k)
    }

    pub fn validate(&self) -> Result<(), FitError> {
        for (name, prior) in &self.0 {
            prior.validate(name)?;
        }
        Ok(())
    }

    /// Fail if any of `names` has no prior.
    pub fn require(&self, names: &[&str]) -> Result<(), FitError> {
        match names.iter().find(|n| !self.0.contains_key(**n)) {
            Some(missing) => Err(FitError::MissingParameter(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Sum of log densities; parameters without a prior are ignored.
    pub fn ln_prior(&self, params: &BTreeMap<String, f64>) -> f64 {
        self.0
            .iter()
            .map(|(name, prior)| match params.get(name) {
                Some(&x) => prior.ln_density(x),
                None => 0.0,
            })
            .sum()
    }

    /// Draw one value for every parameter.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BTreeMap<String, f64>, FitError> {
        self.0
            .iter()
            .map(|(name, prior)| Ok((name.clone(), prior.sample(name, rng)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn validation_rejects_degenerate_priors() {
        assert!(Prior::Normal { mean: 0.0, std: 0.0 }.validate("a").is_err());
        assert!(Prior::Uniform { low: 1.0, high: 1.0 }.validate("a").is_err());
        assert!(Prior::LogUniform { low: 0.0, high: 1.0 }.validate("a").is_err());
        assert!(Prior::Fixed { value: f64::NAN }.validate("a").is_err());
        assert!(Prior::LogUniform { low: 1e-3, high: 1.0 }.validate("a").is_ok());
    }

    #[test]
    fn density_is_neg_inf_outside_support() {
        let u = Prior::Uniform { low: 0.0, high: 2.0 };
        assert_eq!(u.ln_density(3.0), f64::NEG_INFINITY);
        assert!((u.ln_density(1.0) + 2f64.ln()).abs() < 1e-12);

        let lu = Prior::LogUniform { low: 1.0, high: 10.0 };
        assert_eq!(lu.ln_density(0.5), f64::NEG_INFINITY);
        assert!(lu.ln_density(2.0) > lu.ln_density(5.0));
    }

    #[test]
    fn normal_density_peaks_at_mean() {
        let n = Prior::Normal { mean: 1.0, std: 0.5 };
        let peak = n.ln_density(1.0);
        assert!((peak - (-(0.5f64.ln()) - LN_SQRT_2PI)).abs() < 1e-12);
        assert!(n.ln_density(1.3) < peak);
    }

    #[test]
    fn samples_stay_in_support() {
        let mut rng = StdRng::seed_from_u64(7);
        let lu = Prior::LogUniform { low: 1e-3, high: 1e-1 };
        let u = Prior::Uniform { low: -1.0, high: 1.0 };
        for _ in 0..1000 {
            let x = lu.sample("depth", &mut rng).unwrap();
            assert!((1e-3..=1e-1).contains(&x));
            let y = u.sample("t0", &mut rng).unwrap();
            assert!((-1.0..1.0).contains(&y));
        }
        assert_eq!(Prior::Fixed { value: 3.0 }.sample("per", &mut rng).unwrap(), 3.0);
    }

    #[test]
    fn sampling_an_invalid_prior_is_an_error_naming_the_parameter() {
        let mut rng = StdRng::seed_from_u64(1);
        let cases = [
            Prior::Uniform { low: 1.0, high: 1.0 },
            Prior::Uniform { low: 0.0, high: f64::INFINITY },
            Prior::LogUniform { low: -1.0, high: 1.0 },
            Prior::Normal { mean: 0.0, std: -1.0 },
        ];
        for prior in cases {
            match prior.sample("depth", &mut rng) {
                Err(FitError::InvalidPrior { name, .. }) => assert_eq!(name, "depth"),
                other => panic!("{prior:?}: unexpected {other:?}"),
            }
        }

        let set = PriorSet::new().with("per", Prior::Uniform { low: 3.0, high: 2.0 });
        match set.sample(&mut rng) {
            Err(FitError::InvalidPrior { name, .. }) => assert_eq!(name, "per"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn prior_set_json_is_keyed_by_name() {
        let json = r#"{
            "per": { "kind": "fixed", "value": 3.0 },
            "t0": { "kind": "normal", "mean": 1.0, "std": 0.05 },
            "depth": { "kind": "log_uniform", "low": 0.0001, "high": 0.1 }
        }"#;
        let set: PriorSet = serde_json::from_str(json).unwrap();
        set.validate().unwrap();
        assert_eq!(set.get("per"), Some(&Prior::Fixed { value: 3.0 }));
        let free: Vec<&str> = set.free_parameters().collect();
        assert_eq!(free, vec!["depth", "t0"]);
    }

    #[test]
    fn require_reports_first_missing_name() {
        let set = PriorSet::new().with("t0", Prior::Fixed { value: 0.0 });
        match set.require(&["t0", "per"]) {
            Err(FitError::MissingParameter(name)) => assert_eq!(name, "per"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
