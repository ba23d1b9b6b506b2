//! Builds library configuration structs from the TOML file and CLI
//! overrides. CLI flags win over file values, file values over defaults.

use corella_analysis::AnalysisConfig;
use corella_data::ReaderConfig;
use corella_inference::NestedSampler;
use corella_model::{BetaPriorKind, ShapeletPriorPolicy, ToaCentre, ToaPolicy};

use crate::cli::FitArgs;
use crate::config::CorellaConfig;

pub fn reader_config(config: &CorellaConfig, args: &FitArgs) -> ReaderConfig {
    let mut reader = ReaderConfig::new();
    if let Some(pulse_number) = args.pulse_number.or(config.data.pulse_number) {
        reader = reader.with_pulse_number(pulse_number);
    }
    reader
}

pub fn truncate_width(config: &CorellaConfig, args: &FitArgs) -> Option<f64> {
    args.truncate_data.or(config.data.truncate_width)
}

fn prior_policy(config: &CorellaConfig, args: &FitArgs) -> ShapeletPriorPolicy {
    let prior = &config.prior;
    let mut policy = ShapeletPriorPolicy::new()
        .with_mix(args.mix.unwrap_or(prior.mix))
        .with_max_multiplier(prior.max_multiplier);
    if let Some(beta_min) = args.beta_min.or(prior.beta_min) {
        policy = policy.with_beta_min(beta_min);
    }
    if let Some(beta_max) = args.beta_max.or(prior.beta_max) {
        policy = policy.with_beta_max(beta_max);
    }
    if args.log_uniform_beta || prior.log_uniform_beta {
        policy = policy.with_beta_kind(BetaPriorKind::LogUniform);
    }
    let centre = args.toa_centre.or(prior.toa_centre);
    let width = args.toa_width.or(prior.toa_width);
    if let Some(width_fraction) = width {
        let centre = centre.map(ToaCentre::Fraction).unwrap_or(ToaCentre::Auto);
        policy = policy.with_toa(ToaPolicy::Window {
            centre,
            width_fraction,
        });
    }
    policy
}

pub fn analysis_config(config: &CorellaConfig, args: &FitArgs) -> AnalysisConfig {
    let shapelets = args
        .shapelets
        .clone()
        .unwrap_or_else(|| config.model.shapelets.clone());
    AnalysisConfig::new(1)
        .with_shapelet_counts(shapelets)
        .with_polynomial_degree(
            args.polynomial_degree
                .unwrap_or(config.model.polynomial_degree),
        )
        .with_policy(prior_policy(config, args))
        .with_seed(args.seed.or(config.seed).unwrap_or(0))
        .with_label(
            args.label
                .clone()
                .unwrap_or_else(|| config.output.label.clone()),
        )
        .with_n_live(args.n_live.unwrap_or(config.sampler.n_live))
        .with_walk_steps(config.sampler.walk_steps)
        .with_dlogz(config.sampler.dlogz)
        .with_max_iterations(config.sampler.max_iterations)
}

pub fn engine(config: &AnalysisConfig) -> NestedSampler {
    NestedSampler::new()
        .with_n_live(config.n_live())
        .with_walk_steps(config.walk_steps())
        .with_dlogz(config.dlogz())
        .with_max_iterations(config.max_iterations())
}
