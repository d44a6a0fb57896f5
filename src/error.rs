//! Error types.
//!
//! Library code reports [`ConversionError`] (pipeline / cosmology) and
//! [`crate::transit::FitError`] (transit seam). The binary boundary collapses
//! everything into [`AppError`], which carries a process exit code.

use thiserror::Error;

/// Exit code for usage, configuration and IO problems.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a quantity that could not be computed.
pub const EXIT_DOMAIN: u8 = 3;
/// Exit code for transit fitting failures.
pub const EXIT_FIT: u8 = 4;

/// A named quantity produced by the conversion pipeline.
///
/// Used to report which stage aborted a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    InfraredLuminosity,
    Co10Luminosity,
    ObservedFrequency,
    LineSelection,
    LineLuminosity,
    LensedLuminosity,
    LuminosityDistance,
    IntegratedFlux,
    FluxDensity,
    H2Mass,
}

impl Stage {
    pub fn quantity(self) -> &'static str {
        match self {
            Stage::InfraredLuminosity => "infrared luminosity L_IR",
            Stage::Co10Luminosity => "CO(1-0) luminosity L'_CO",
            Stage::ObservedFrequency => "observed line frequency",
            Stage::LineSelection => "observing line",
            Stage::LineLuminosity => "line luminosity L'_line",
            Stage::LensedLuminosity => "lensed line luminosity",
            Stage::LuminosityDistance => "luminosity distance D_L",
            Stage::IntegratedFlux => "integrated flux S*dV",
            Stage::FluxDensity => "flux density S",
            Stage::H2Mass => "molecular gas mass M_H2",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.quantity())
    }
}

/// Errors raised while computing derived quantities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// An input violates a mathematical precondition of a stage.
    #[error("cannot compute {stage}: {reason}")]
    Domain { stage: Stage, reason: String },

    /// A physical constant or spectral line entry is missing or malformed.
    #[error("invalid configuration for {what}: {reason}")]
    Configuration { what: String, reason: String },
}

impl ConversionError {
    pub fn domain(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Domain {
            stage,
            reason: reason.into(),
        }
    }

    pub fn configuration(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// The stage that failed, if this is a domain error.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Domain { stage, .. } => Some(*stage),
            Self::Configuration { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        let code = match err {
            ConversionError::Domain { .. } => EXIT_DOMAIN,
            ConversionError::Configuration { .. } => EXIT_USAGE,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<crate::transit::FitError> for AppError {
    fn from(err: crate::transit::FitError) -> Self {
        let code = match err {
            crate::transit::FitError::InvalidPrior { .. }
            | crate::transit::FitError::MissingParameter(_)
            | crate::transit::FitError::InvalidData { .. } => EXIT_USAGE,
            crate::transit::FitError::NoValidCandidates => EXIT_FIT,
        };
        AppError::new(code, err.to_string())
    }
}
