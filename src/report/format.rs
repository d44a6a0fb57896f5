//! Terminal formatting for pipeline results, line tables and prior sets.
//!
//! Presentation only: nothing here feeds back into the computation.

use crate::domain::{DerivedQuantities, LineFrequency, ObservationParameters};
use crate::physics::lines::ObservedLine;
use crate::transit::{Posterior, PriorSet};

/// Format the full run summary (inputs + every derived quantity).
pub fn format_run_summary(
    name: Option<&str>,
    obs: &ObservationParameters,
    derived: &DerivedQuantities,
    cosmology: &str,
) -> String {
    let mut out = String::new();

    out.push_str("=== molgas - CO / molecular gas budget ===\n");
    if let Some(name) = name {
        out.push_str(&format!("Target: {name}\n"));
    }
    out.push_str(&format!(
        "Inputs: z={} | SFR={} Msun/yr | mu={} | dV={} km/s\n",
        obs.redshift, obs.star_formation_rate, obs.lensing_magnification, obs.velocity_dispersion
    ));
    out.push_str(&format!("Cosmology: {cosmology}\n"));

    out.push_str("\nObserved frequencies:\n");
    out.push_str(&format_frequency_rows(&derived.observed_lines, Some(&derived.selected_line)));

    out.push_str("\nDerived quantities:\n");
    let rows: [(&str, String, &str); 10] = [
        ("L_IR", sci(derived.infrared_luminosity), "erg/s"),
        ("L'_CO(1-0)", sci(derived.co10_luminosity), "K km/s pc^2"),
        ("line ratio", format!("{:.2}", derived.line_ratio), ""),
        ("L'_line", sci(derived.line_luminosity), "K km/s pc^2"),
        ("L'_line (lensed)", sci(derived.lensed_luminosity), "K km/s pc^2"),
        ("D_L", format!("{:.1}", derived.luminosity_distance_mpc), "Mpc"),
        ("S dV", format!("{:.2}", derived.integrated_flux), "Jy km/s"),
        ("S", sci(derived.flux_density), "Jy"),
        ("M_H2", sci(derived.h2_mass), "Msun"),
        (
            "line",
            format!("{} @ {:.2}", derived.selected_line, derived.selected_frequency_ghz),
            "GHz",
        ),
    ];
    for (label, value, unit) in rows {
        out.push_str(format!("  {label:<18} {value:>18} {unit}\n").trim_end());
        out.push('\n');
    }

    out
}

/// Format the observed-frequency table for a redshift.
pub fn format_line_table(redshift: f64, observed: &[ObservedLine]) -> String {
    let rows: Vec<LineFrequency> = observed
        .iter()
        .map(|o| LineFrequency {
            name: o.line.name.to_string(),
            rest_frequency_ghz: o.line.rest_frequency_ghz,
            observed_frequency_ghz: o.observed_frequency_ghz,
            band: o.band.map(|b| b.number),
        })
        .collect();

    let mut out = format!("CO lines at z={redshift}:\n");
    out.push_str(&format_frequency_rows(&rows, None));
    out
}

fn format_frequency_rows(rows: &[LineFrequency], selected: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(
        format!("  {:<10} {:>12} {:>12} {:<8}\n", "line", "rest_GHz", "obs_GHz", "band").trim_end(),
    );
    out.push('\n');
    for r in rows {
        let marker = if selected == Some(r.name.as_str()) { "*" } else { " " };
        let band = r.band.map(|b| format!("B{b}")).unwrap_or_else(|| "-".to_string());
        out.push_str(
            format!(
                "{marker} {:<10} {:>12.3} {:>12.3} {:<8}\n",
                r.name, r.rest_frequency_ghz, r.observed_frequency_ghz, band
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format a prior set, one parameter per line.
pub fn format_priors(priors: &PriorSet) -> String {
    if priors.is_empty() {
        return "Priors: none\n".to_string();
    }
    let mut out = format!("Priors ({} parameters):\n", priors.len());
    for (name, prior) in priors.iter() {
        let free = if prior.is_free() { "free" } else { "fixed" };
        out.push_str(&format!("  {name:<20} {free:<6} {}\n", prior.describe()));
    }
    out
}

/// Format a fit result, one parameter per line.
pub fn format_posterior(posterior: &Posterior) -> String {
    let mut out = format!(
        "Best fit ({} draws): ln L = {:.3}, ln posterior = {:.3}\n",
        posterior.n_evaluations, posterior.ln_likelihood, posterior.ln_posterior
    );
    for (name, value) in &posterior.parameters {
        out.push_str(&format!("  {name:<20} {value:.6}\n"));
    }
    out
}

fn sci(v: f64) -> String {
    format!("{v:.2e}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::FixedDistance;
    use crate::physics::constants::{ALMA_BANDS, CO_LINES};
    use crate::physics::lines::observed_frequencies;
    use crate::physics::{ConversionPipeline, LinePolicy, PhysicalConstants};
    use crate::transit::Prior;

    fn reference() -> ObservationParameters {
        ObservationParameters {
            redshift: 1.036,
            star_formation_rate: 30.0,
            lensing_magnification: 4.3,
            velocity_dispersion: 200.0,
        }
    }

    #[test]
    fn summary_uses_scientific_notation() {
        let cosmo = FixedDistance(7100.0);
        let pipeline = ConversionPipeline::new(PhysicalConstants::standard(), &cosmo).unwrap();
        let derived = pipeline
            .run(&reference(), &LinePolicy::Named("CO(3-2)".into()), None)
            .unwrap();
        let text = format_run_summary(Some("ref"), &reference(), &derived, "fixed");
        assert!(text.contains("6.67e44"), "{text}");
        assert!(text.contains("3.01e9"), "{text}");
        assert!(text.contains("* CO(3-2)"), "{text}");
        assert!(text.contains("Target: ref"));
    }

    #[test]
    fn line_table_lists_every_line() {
        let observed = observed_frequencies(&CO_LINES, 1.036, &ALMA_BANDS).unwrap();
        let text = format_line_table(1.036, &observed);
        for line in CO_LINES {
            assert!(text.contains(line.name));
        }
        assert!(text.contains("169.841"));
    }

    #[test]
    fn priors_table_marks_fixed() {
        let set = PriorSet::new()
            .with("per", Prior::Fixed { value: 3.0 })
            .with("t0", Prior::Uniform { low: 0.0, high: 1.0 });
        let text = format_priors(&set);
        assert!(text.contains("fixed"));
        assert!(text.contains("uniform(0, 1)"));
    }

    #[test]
    fn empty_prior_set_says_none() {
        assert_eq!(format_priors(&PriorSet::new()), "Priors: none\n");
    }
}
