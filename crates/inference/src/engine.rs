use corella_prior::PriorSet;
use ndarray::Array2;

use crate::error::EngineError;

/// A log-likelihood evaluated on a flat parameter vector.
///
/// The vector ordering is fixed by the prior set the engine is run with.
pub trait LogLikelihood {
    fn dimension(&self) -> usize;

    /// May return `f64::NEG_INFINITY` for forbidden regions, never NaN.
    fn log_likelihood(&self, params: &[f64]) -> f64;
}

/// A stochastic sampler producing posterior samples and an evidence estimate.
pub trait InferenceEngine {
    fn run(
        &self,
        likelihood: &dyn LogLikelihood,
        priors: &PriorSet,
        seed: u64,
    ) -> Result<EngineRun, EngineError>;
}

/// Output of a single engine run.
#[derive(Clone, Debug)]
pub struct EngineRun {
    samples: Array2<f64>,
    log_likelihoods: Vec<f64>,
    log_evidence: f64,
    log_evidence_err: f64,
    n_iterations: usize,
    n_likelihood_evaluations: usize,
}

impl EngineRun {
    pub fn new(
        samples: Array2<f64>,
        log_likelihoods: Vec<f64>,
        log_evidence: f64,
        log_evidence_err: f64,
        n_iterations: usize,
        n_likelihood_evaluations: usize,
    ) -> Self {
        assert_eq!(samples.nrows(), log_likelihoods.len());
        Self {
            samples,
            log_likelihoods,
            log_evidence,
            log_evidence_err,
            n_iterations,
            n_likelihood_evaluations,
        }
    }

    /// Equally weighted posterior samples, one row per draw.
    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    pub fn log_likelihoods(&self) -> &[f64] {
        &self.log_likelihoods
    }

    pub fn log_evidence(&self) -> f64 {
        self.log_evidence
    }

    pub fn log_evidence_err(&self) -> f64 {
        self.log_evidence_err
    }

    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    pub fn n_likelihood_evaluations(&self) -> usize {
        self.n_likelihood_evaluations
    }

    /// Row index of the highest-likelihood posterior sample.
    pub fn max_likelihood_index(&self) -> usize {
        self.log_likelihoods
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// The highest-likelihood posterior sample as a vector.
    pub fn max_likelihood_sample(&self) -> Vec<f64> {
        self.samples
            .row(self.max_likelihood_index())
            .iter()
            .copied()
            .collect()
    }

    /// Per-parameter posterior mean.
    pub fn posterior_mean(&self) -> Vec<f64> {
        let n = self.samples.nrows() as f64;
        (0..self.samples.ncols())
            .map(|j| self.samples.column(j).sum() / n)
            .collect()
    }

    /// Per-parameter posterior standard deviation.
    pub fn posterior_std(&self) -> Vec<f64> {
        let n = self.samples.nrows() as f64;
        let means = self.posterior_mean();
        (0..self.samples.ncols())
            .map(|j| {
                let var = self
                    .samples
                    .column(j)
                    .iter()
                    .map(|v| (v - means[j]).powi(2))
                    .sum::<f64>()
                    / n;
                var.sqrt()
            })
            .collect()
    }
}
