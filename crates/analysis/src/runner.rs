use std::collections::BTreeMap;

use corella_data::TimeSeries;
use corella_inference::{
    FluxLikelihood, InferenceEngine, LogLikelihood, NoiseModel, SIGMA_KEY,
};
use corella_model::{CompositeFluxModel, FluxModel, ToaPolicy};
use corella_prior::{Prior, PriorSet};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::maxl::refine_max_likelihood;
use crate::result::{AnalysisResult, RunRecord, RunReport};

/// A model/data pairing before its priors exist.
///
/// `build_priors` moves the setup into a [`PreparedRun`]; construction
/// failures (name collisions, invalid prior ranges) surface here, before
/// any sampling starts.
pub struct RunSetup {
    name: String,
    model: CompositeFluxModel,
    data: TimeSeries,
    noise: NoiseModel,
}

impl RunSetup {
    pub fn new(
        name: impl Into<String>,
        model: CompositeFluxModel,
        data: TimeSeries,
        noise: NoiseModel,
    ) -> Self {
        Self {
            name: name.into(),
            model,
            data,
            noise,
        }
    }

    /// Assembles the combined prior set and the likelihood.
    pub fn build_priors(self) -> Result<PreparedRun, AnalysisError> {
        let mut priors = self.model.priors(&self.data)?;
        if self.noise == NoiseModel::Fitted {
            priors.insert(
                SIGMA_KEY,
                Prior::uniform(0.0, self.data.flux_range())?,
            )?;
        }
        let likelihood = FluxLikelihood::new(self.data, self.model, &priors, self.noise)?;
        Ok(PreparedRun {
            name: self.name,
            priors,
            likelihood,
        })
    }
}

/// A run with a collision-free prior set, ready to sample.
pub struct PreparedRun {
    name: String,
    priors: PriorSet,
    likelihood: FluxLikelihood,
}

impl PreparedRun {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priors(&self) -> &PriorSet {
        &self.priors
    }

    pub fn likelihood(&self) -> &FluxLikelihood {
        &self.likelihood
    }

    /// Runs the engine once. Engine failures become a terminal
    /// [`RunReport::Failed`]; they are reported, never retried.
    pub fn sample(&self, engine: &dyn InferenceEngine, seed: u64) -> RunReport {
        info!(
            run = %self.name,
            ndim = self.priors.len(),
            seed,
            "starting sampling run"
        );
        match engine.run(&self.likelihood, &self.priors, seed) {
            Ok(run) => {
                info!(
                    run = %self.name,
                    log_evidence = run.log_evidence(),
                    log_evidence_err = run.log_evidence_err(),
                    n_iterations = run.n_iterations(),
                    "run converged"
                );
                let names = self
                    .likelihood
                    .parameter_names()
                    .to_vec();
                RunReport::Converged(RunRecord::from_engine_run(&self.name, names, &run))
            }
            Err(err) => {
                warn!(run = %self.name, error = %err, "run failed");
                RunReport::Failed {
                    name: self.name.clone(),
                    diagnostic: err.to_string(),
                }
            }
        }
    }
}

/// Builds the null and full models from a configuration and compares their
/// evidences on one time series.
pub struct AnalysisRunner {
    config: AnalysisConfig,
}

impl AnalysisRunner {
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Baseline plus every shapelet component.
    fn full_model(&self, data: &TimeSeries) -> Result<CompositeFluxModel, AnalysisError> {
        let counts = self.config.shapelet_counts();
        let n_components = counts.len();
        let mut components = Vec::with_capacity(n_components + 1);
        for (index, &count) in counts.iter().enumerate() {
            let mut policy = self.config.policy().clone();
            // Components sharing the full span would be exchangeable, so
            // several of them default to disjoint arrival-time slices.
            if n_components > 1 && policy.toa() == ToaPolicy::FullSpan {
                policy = policy.with_toa(ToaPolicy::Partition {
                    index,
                    count: n_components,
                });
            }
            let component = if n_components > 1 {
                FluxModel::labelled_shapelet(count, format!("S{index}"), policy)?
            } else {
                FluxModel::shapelet(count, policy)?
            };
            components.push(component);
        }
        components.push(FluxModel::polynomial(
            self.config.polynomial_degree(),
            data.mid_time(),
        ));
        Ok(CompositeFluxModel::new(components)?)
    }

    /// Baseline only.
    fn null_model(&self, data: &TimeSeries) -> Result<CompositeFluxModel, AnalysisError> {
        Ok(CompositeFluxModel::new(vec![FluxModel::polynomial(
            self.config.polynomial_degree(),
            data.mid_time(),
        )])?)
    }

    /// Runs the null and full models independently and assembles the result.
    ///
    /// Both models are built and their priors assembled before either run
    /// samples, so construction errors abort up front with no engine work
    /// lost. The runs share nothing but the data: separate likelihoods,
    /// separate prior sets, consecutive seeds. A sampling failure in one
    /// leaves the other's report intact.
    pub fn run(
        &self,
        data: &TimeSeries,
        engine: &dyn InferenceEngine,
    ) -> Result<AnalysisResult, AnalysisError> {
        let noise = if data.uncertainty().is_some() {
            NoiseModel::Known
        } else {
            NoiseModel::Fitted
        };
        info!(
            label = %self.config.label(),
            n_samples = data.len(),
            noise = ?noise,
            "starting analysis"
        );

        let prepared_null =
            RunSetup::new("null", self.null_model(data)?, data.clone(), noise.clone())
                .build_priors()?;
        let prepared_full = RunSetup::new(
            "full",
            self.full_model(data)?,
            data.clone(),
            noise,
        )
        .build_priors()?;
        let priors: Vec<(String, Prior)> = prepared_full
            .priors()
            .iter()
            .map(|(name, prior)| (name.to_string(), prior.clone()))
            .collect();

        let null_run = prepared_null.sample(engine, self.config.seed());
        let full_run = prepared_full.sample(engine, self.config.seed().wrapping_add(1));

        let log_bayes_factor = match (null_run.record(), full_run.record()) {
            (Some(null), Some(full)) => {
                let log_b = full.log_evidence - null.log_evidence;
                info!(log_bayes_factor = log_b, "model comparison complete");
                Some(log_b)
            }
            _ => None,
        };

        let (max_likelihood, residuals) = match full_run.record() {
            Some(record) => self.refine(&prepared_full, record, data),
            None => (None, None),
        };

        Ok(AnalysisResult {
            label: self.config.label().to_string(),
            seed: self.config.seed(),
            priors,
            null_run,
            full_run,
            log_bayes_factor,
            max_likelihood,
            residuals,
        })
    }

    fn refine(
        &self,
        prepared: &PreparedRun,
        record: &RunRecord,
        data: &TimeSeries,
    ) -> (Option<BTreeMap<String, f64>>, Option<Vec<f64>>) {
        let Some(best) = record.max_likelihood_sample() else {
            return (None, None);
        };
        let refined = refine_max_likelihood(prepared.likelihood(), prepared.priors(), best);
        info!(
            log_likelihood = prepared.likelihood().log_likelihood(&refined),
            "refined maximum-likelihood point"
        );
        let map = prepared.likelihood().param_map(&refined);
        let residuals = match prepared.likelihood().model().evaluate(&map, data.time()) {
            Ok(flux) => Some(
                data.flux()
                    .iter()
                    .zip(&flux)
                    .map(|(observed, model)| observed - model)
                    .collect(),
            ),
            Err(err) => {
                warn!(error = %err, "residual evaluation failed");
                None
            }
        };
        (Some(map), residuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corella_model::ShapeletPriorPolicy;

    fn series(uncertainty: Option<Vec<f64>>) -> TimeSeries {
        let time: Vec<f64> = (0..64).map(|i| i as f64 * 0.05).collect();
        let flux: Vec<f64> = time.iter().map(|t| 0.1 + 0.02 * t).collect();
        TimeSeries::new(time, flux, uncertainty).unwrap()
    }

    #[test]
    fn fitted_noise_adds_sigma_prior() {
        let data = series(None);
        let runner = AnalysisRunner::new(AnalysisConfig::new(2)).unwrap();
        let prepared = RunSetup::new(
            "full",
            runner.full_model(&data).unwrap(),
            data,
            NoiseModel::Fitted,
        )
        .build_priors()
        .unwrap();
        assert!(prepared.priors().contains(SIGMA_KEY));
    }

    #[test]
    fn known_noise_has_no_sigma_prior() {
        let data = series(Some(vec![0.05; 64]));
        let runner = AnalysisRunner::new(AnalysisConfig::new(2)).unwrap();
        let prepared = RunSetup::new(
            "full",
            runner.full_model(&data).unwrap(),
            data,
            NoiseModel::Known,
        )
        .build_priors()
        .unwrap();
        assert!(!prepared.priors().contains(SIGMA_KEY));
    }

    #[test]
    fn null_model_is_baseline_only() {
        let data = series(Some(vec![0.05; 64]));
        let runner = AnalysisRunner::new(
            AnalysisConfig::new(2).with_polynomial_degree(1),
        )
        .unwrap();
        let null = runner.null_model(&data).unwrap();
        assert_eq!(null.parameter_names(), vec!["B0", "B1"]);
    }

    #[test]
    fn multiple_components_get_disjoint_arrival_slices() {
        let data = series(Some(vec![0.05; 64]));
        let runner = AnalysisRunner::new(
            AnalysisConfig::new(2).with_shapelet_counts(vec![2, 2]),
        )
        .unwrap();
        let full = runner.full_model(&data).unwrap();
        let names = full.parameter_names();
        assert!(names.contains(&"toa_S0"));
        assert!(names.contains(&"toa_S1"));

        let priors = full.priors(&data).unwrap();
        let first = priors.get("toa_S0").unwrap();
        let second = priors.get("toa_S1").unwrap();
        assert!(first.maximum() <= second.minimum());
    }

    #[test]
    fn explicit_window_policy_is_not_overridden() {
        let data = series(Some(vec![0.05; 64]));
        let policy = ShapeletPriorPolicy::new().with_toa(ToaPolicy::Window {
            centre: corella_model::ToaCentre::Fraction(0.5),
            width_fraction: 0.1,
        });
        let runner = AnalysisRunner::new(
            AnalysisConfig::new(2)
                .with_shapelet_counts(vec![2, 2])
                .with_policy(policy),
        )
        .unwrap();
        let full = runner.full_model(&data).unwrap();
        let priors = full.priors(&data).unwrap();
        let first = priors.get("toa_S0").unwrap();
        let second = priors.get("toa_S1").unwrap();
        assert_eq!(first, second);
    }

    struct CountingEngine {
        calls: std::cell::Cell<usize>,
    }

    impl InferenceEngine for CountingEngine {
        fn run(
            &self,
            _likelihood: &dyn LogLikelihood,
            _priors: &PriorSet,
            _seed: u64,
        ) -> Result<corella_inference::EngineRun, corella_inference::EngineError> {
            self.calls.set(self.calls.get() + 1);
            Err(corella_inference::EngineError::EmptyPriorSet)
        }
    }

    #[test]
    fn construction_error_aborts_before_sampling() {
        // Constant flux degenerates the full model's coefficient slab while
        // the null baseline prior still builds, so the error must surface
        // before the null run has spent any engine time.
        let time: Vec<f64> = (0..64).map(|i| i as f64 * 0.05).collect();
        let data = TimeSeries::new(time, vec![0.3; 64], Some(vec![0.05; 64])).unwrap();
        let runner = AnalysisRunner::new(AnalysisConfig::new(2)).unwrap();
        let engine = CountingEngine {
            calls: std::cell::Cell::new(0),
        };
        let err = runner.run(&data, &engine).unwrap_err();
        assert!(matches!(err, AnalysisError::Model(_)));
        assert_eq!(engine.calls.get(), 0);
    }
}
