//! Environment-level defaults.
//!
//! `.env` is loaded (if present) before reading the process environment.
//! Precedence for every setting is: CLI flag > scenario file > environment >
//! built-in default.

use crate::cosmology::CosmologyKind;
use crate::error::{AppError, EXIT_USAGE};

pub const ENV_COSMOLOGY: &str = "MOLGAS_COSMOLOGY";
pub const ENV_LOG: &str = "MOLGAS_LOG";

const KNOWN_COSMOLOGIES: &str = "planck15, planck18 or wmap9";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDefaults {
    pub cosmology: Option<CosmologyKind>,
}

impl EnvDefaults {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in practice).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cosmology = match lookup(ENV_COSMOLOGY) {
            Some(raw) if !raw.trim().is_empty() => {
                let kind = CosmologyKind::parse(raw.trim()).ok_or_else(|| {
                    AppError::new(
                        EXIT_USAGE,
                        format!("Invalid {ENV_COSMOLOGY}='{raw}' (expected {KNOWN_COSMOLOGIES})."),
                    )
                })?;
                Some(kind)
            }
            _ => None,
        };
        Ok(Self { cosmology })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_gives_no_defaults() {
        let env = EnvDefaults::from_lookup(|_| None).unwrap();
        assert_eq!(env, EnvDefaults::default());
    }

    #[test]
    fn cosmology_from_env() {
        let env = EnvDefaults::from_lookup(|k| (k == ENV_COSMOLOGY).then(|| "WMAP9".to_string()))
            .unwrap();
        assert_eq!(env.cosmology, Some(CosmologyKind::Wmap9));
    }

    #[test]
    fn bad_cosmology_is_usage_error() {
        let err = EnvDefaults::from_lookup(|_| Some("einstein-de-sitter".to_string())).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_USAGE);
    }
}
