//! Command-line parsing.
//!
//! Argument parsing and command dispatch are kept apart from the physics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cosmology::CosmologyKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "molgas",
    version,
    about = "CO line luminosity, flux and molecular gas mass from a star formation rate"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the SFR -> L_IR -> L'_CO -> flux -> M_H2 conversion and print the results.
    Convert(ConvertArgs),
    /// List every CO line's observed frequency and ALMA band at a redshift.
    Lines(LinesArgs),
    /// Validate a prior file and print its contents.
    Priors(PriorsArgs),
    /// Fit a box transit model to photometry with the built-in prior search.
    Fit(FitArgs),
}

/// Options for `molgas convert`.
///
/// Observation flags override the corresponding scenario file values.
#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Scenario JSON (observation parameters plus optional overrides).
    #[arg(long, value_name = "JSON")]
    pub scenario: Option<PathBuf>,

    /// Source redshift.
    #[arg(short = 'z', long, allow_negative_numbers = true)]
    pub redshift: Option<f64>,

    /// Star formation rate (Msun/yr).
    #[arg(long, allow_negative_numbers = true)]
    pub sfr: Option<f64>,

    /// Lensing magnification factor.
    #[arg(long, allow_negative_numbers = true)]
    pub magnification: Option<f64>,

    /// Line velocity width (km/s).
    #[arg(long, allow_negative_numbers = true)]
    pub velocity_dispersion: Option<f64>,

    /// Observe this line, e.g. "CO(3-2)".
    #[arg(long, conflicts_with_all = ["band", "any_band"])]
    pub line: Option<String>,

    /// Pick the line closest to the center of this ALMA band.
    #[arg(long, conflicts_with = "any_band")]
    pub band: Option<u8>,

    /// Pick the lowest-J line that lands in any ALMA band.
    #[arg(long)]
    pub any_band: bool,

    /// Override L'_line / L'_CO(1-0) for the chosen line.
    #[arg(long)]
    pub line_ratio: Option<f64>,

    /// Cosmology used for the luminosity distance.
    #[arg(long, value_enum)]
    pub cosmology: Option<CosmologyKind>,

    /// Use a fixed luminosity distance (Mpc) instead of a cosmology.
    #[arg(long)]
    pub distance_mpc: Option<f64>,

    /// Export inputs and derived quantities to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `molgas lines`.
#[derive(Debug, Args, Clone)]
pub struct LinesArgs {
    /// Source redshift.
    #[arg(short = 'z', long, allow_negative_numbers = true)]
    pub redshift: f64,
}

/// Options for `molgas priors`.
#[derive(Debug, Args, Clone)]
pub struct PriorsArgs {
    /// Prior JSON file (parameter name -> distribution).
    #[arg(long, value_name = "JSON")]
    pub file: PathBuf,
}

/// Options for `molgas fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Prior JSON file.
    #[arg(long, value_name = "JSON")]
    pub priors: PathBuf,

    /// Photometry JSON: instrument -> {times, fluxes, flux_errors}.
    #[arg(long, value_name = "JSON")]
    pub data: PathBuf,

    /// Number of prior draws to score.
    #[arg(long, default_value_t = 20_000)]
    pub draws: usize,

    /// Random seed for the prior draws.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
