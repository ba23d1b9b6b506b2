use std::collections::BTreeMap;

use corella_inference::EngineRun;
use corella_prior::Prior;
use serde::{Deserialize, Serialize};

/// One converged engine run, flattened for persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub name: String,
    pub parameter_names: Vec<String>,
    pub log_evidence: f64,
    pub log_evidence_err: f64,
    pub n_iterations: usize,
    pub n_likelihood_evaluations: usize,
    /// Equally weighted posterior draws, one inner vector per draw.
    pub samples: Vec<Vec<f64>>,
    pub log_likelihoods: Vec<f64>,
}

impl RunRecord {
    pub fn from_engine_run(
        name: impl Into<String>,
        parameter_names: Vec<String>,
        run: &EngineRun,
    ) -> Self {
        let samples = run
            .samples()
            .rows()
            .into_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self {
            name: name.into(),
            parameter_names,
            log_evidence: run.log_evidence(),
            log_evidence_err: run.log_evidence_err(),
            n_iterations: run.n_iterations(),
            n_likelihood_evaluations: run.n_likelihood_evaluations(),
            samples,
            log_likelihoods: run.log_likelihoods().to_vec(),
        }
    }

    fn column(&self, name: &str) -> Option<Vec<f64>> {
        let index = self.parameter_names.iter().position(|n| n == name)?;
        Some(self.samples.iter().map(|row| row[index]).collect())
    }

    /// Posterior median of one parameter.
    pub fn posterior_median(&self, name: &str) -> Option<f64> {
        let mut values = self.column(name)?;
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 1 {
            Some(values[mid])
        } else {
            Some(0.5 * (values[mid - 1] + values[mid]))
        }
    }

    /// Posterior standard deviation of one parameter.
    pub fn posterior_std(&self, name: &str) -> Option<f64> {
        let values = self.column(name)?;
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(var.sqrt())
    }

    /// The highest-likelihood posterior draw.
    pub fn max_likelihood_sample(&self) -> Option<&[f64]> {
        let index = self
            .log_likelihoods
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)?;
        self.samples.get(index).map(Vec::as_slice)
    }
}

/// Outcome of one engine run. A failed run is terminal and carries the
/// engine's diagnostic message; it is never retried.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunReport {
    Converged(RunRecord),
    Failed { name: String, diagnostic: String },
}

impl RunReport {
    pub fn name(&self) -> &str {
        match self {
            Self::Converged(record) => &record.name,
            Self::Failed { name, .. } => name,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    pub fn record(&self) -> Option<&RunRecord> {
        match self {
            Self::Converged(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }
}

/// Complete output of a null/full comparison, JSON-serializable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub label: String,
    pub seed: u64,
    /// Prior specification of the full model, in parameter order.
    pub priors: Vec<(String, Prior)>,
    pub null_run: RunReport,
    pub full_run: RunReport,
    /// `log Z_full - log Z_null`; absent unless both runs converged.
    pub log_bayes_factor: Option<f64>,
    /// Refined maximum-likelihood parameters of the full model.
    pub max_likelihood: Option<BTreeMap<String, f64>>,
    /// Observed flux minus the maximum-likelihood model flux.
    pub residuals: Option<Vec<f64>>,
}
