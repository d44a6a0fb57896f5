//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - sets up logging and environment defaults
//! - parses CLI arguments
//! - merges scenario files with flags
//! - runs the conversion pipeline or the transit fitter
//! - prints reports and writes optional exports

use chrono::Utc;
use clap::Parser;
use tracing::{debug, warn};

use crate::cli::{Command, ConvertArgs, FitArgs, LinesArgs, PriorsArgs};
use crate::config::EnvDefaults;
use crate::cosmology::CosmologyKind;
use crate::domain::{LineChoice, ObservationParameters, RunConfig, Scenario};
use crate::error::{AppError, EXIT_USAGE};
use crate::io::ResultFile;
use crate::physics::constants::{ALMA_BANDS, CO_LINES};
use crate::physics::lines::observed_frequencies;
use crate::transit::{PriorSearchFitter, TransitFitter};

pub mod pipeline;

/// Entry point for the `molgas` binary.
pub fn run() -> Result<(), AppError> {
    crate::logging::init_logging();
    let env = EnvDefaults::from_env()?;
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Convert(args) => handle_convert(args, &env),
        Command::Lines(args) => handle_lines(args),
        Command::Priors(args) => handle_priors(args),
        Command::Fit(args) => handle_fit(args),
    }
}

fn handle_convert(args: ConvertArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let scenario = match &args.scenario {
        Some(path) => Some(crate::io::read_scenario_json(path)?),
        None => None,
    };
    let config = run_config_from_args(&args, scenario, env)?;
    let run = pipeline::run_conversion(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(
            config.name.as_deref(),
            &config.observation,
            &run.derived,
            &run.cosmology,
        )
    );

    if let Some(path) = &config.export {
        let result = ResultFile {
            tool: "molgas".to_string(),
            generated_at: Utc::now(),
            name: config.name.clone(),
            cosmology: run.cosmology.clone(),
            observation: config.observation,
            constants: config.constants,
            derived: run.derived,
        };
        crate::io::write_results_json(path, &result)?;
        debug!(path = %path.display(), "wrote results");
    }

    Ok(())
}

fn handle_lines(args: LinesArgs) -> Result<(), AppError> {
    let observed = observed_frequencies(&CO_LINES, args.redshift, &ALMA_BANDS)?;
    println!("{}", crate::report::format_line_table(args.redshift, &observed));
    Ok(())
}

fn handle_priors(args: PriorsArgs) -> Result<(), AppError> {
    let priors = crate::io::read_priors_json(&args.file)?;
    println!("{}", crate::report::format_priors(&priors));
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let priors = crate::io::read_priors_json(&args.priors)?;
    let data = crate::io::read_time_series_json(&args.data)?;
    let fitter = PriorSearchFitter {
        draws: args.draws,
        seed: args.seed,
    };
    let posterior = fitter.fit(&priors, &data)?;

    println!("{}", crate::report::format_priors(&priors));
    println!("{}", crate::report::format_posterior(&posterior));
    Ok(())
}

/// Merge CLI flags, an optional scenario file and environment defaults.
///
/// Flags win over the scenario, the scenario wins over the environment.
pub fn run_config_from_args(
    args: &ConvertArgs,
    scenario: Option<Scenario>,
    env: &EnvDefaults,
) -> Result<RunConfig, AppError> {
    let base = scenario.as_ref().map(|s| s.observation);
    let field = |flag: Option<f64>, from_scenario: Option<f64>, name: &str| {
        flag.or(from_scenario).ok_or_else(|| {
            AppError::new(
                EXIT_USAGE,
                format!("Missing --{name} (and no scenario file provides it)."),
            )
        })
    };
    let observation = ObservationParameters {
        redshift: field(args.redshift, base.map(|b| b.redshift), "redshift")?,
        star_formation_rate: field(args.sfr, base.map(|b| b.star_formation_rate), "sfr")?,
        lensing_magnification: field(
            args.magnification,
            base.map(|b| b.lensing_magnification),
            "magnification",
        )?,
        velocity_dispersion: field(
            args.velocity_dispersion,
            base.map(|b| b.velocity_dispersion),
            "velocity-dispersion",
        )?,
    };

    let flag_line = if let Some(name) = &args.line {
        Some(LineChoice::Named(name.clone()))
    } else if let Some(band) = args.band {
        Some(LineChoice::Band(band))
    } else if args.any_band {
        Some(LineChoice::AnyBand)
    } else {
        None
    };

    let (name, constants, scenario_line, scenario_ratio, scenario_cosmology) = match scenario {
        Some(s) => (s.name, s.constants, s.line, s.line_ratio, s.cosmology),
        None => (None, Default::default(), None, None, None),
    };

    let line = flag_line.or(scenario_line).unwrap_or_default();
    let cosmology = args
        .cosmology
        .or(scenario_cosmology)
        .or(env.cosmology)
        .unwrap_or(CosmologyKind::Planck15);

    if args.distance_mpc.is_some() && args.cosmology.is_some() {
        warn!("--distance-mpc given; ignoring --cosmology");
    }

    Ok(RunConfig {
        name,
        observation,
        constants,
        line,
        line_ratio: args.line_ratio.or(scenario_ratio),
        cosmology,
        distance_mpc: args.distance_mpc,
        export: args.export.clone(),
    })
}
