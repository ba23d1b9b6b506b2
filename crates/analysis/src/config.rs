use corella_model::ShapeletPriorPolicy;

use crate::error::AnalysisError;

const DEFAULT_N_LIVE: usize = 500;
const DEFAULT_WALK_STEPS: usize = 25;
const DEFAULT_DLOGZ: f64 = 0.1;
const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Everything a single analysis needs, carried explicitly.
///
/// Engine settings and run identity travel in this struct rather than in
/// process-global state, so concurrent analyses cannot interfere.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    label: String,
    seed: u64,
    shapelet_counts: Vec<usize>,
    polynomial_degree: usize,
    policy: ShapeletPriorPolicy,
    n_live: usize,
    walk_steps: usize,
    dlogz: f64,
    max_iterations: usize,
}

impl AnalysisConfig {
    /// One shapelet component with `n_shapelets` coefficients plus a
    /// flat baseline, default engine settings.
    pub fn new(n_shapelets: usize) -> Self {
        Self {
            label: "corella".to_string(),
            seed: 0,
            shapelet_counts: vec![n_shapelets],
            polynomial_degree: 0,
            policy: ShapeletPriorPolicy::new(),
            n_live: DEFAULT_N_LIVE,
            walk_steps: DEFAULT_WALK_STEPS,
            dlogz: DEFAULT_DLOGZ,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// One entry per pulse component, each the number of shapelet
    /// coefficients for that component.
    pub fn with_shapelet_counts(mut self, counts: Vec<usize>) -> Self {
        self.shapelet_counts = counts;
        self
    }

    pub fn with_polynomial_degree(mut self, degree: usize) -> Self {
        self.polynomial_degree = degree;
        self
    }

    pub fn with_policy(mut self, policy: ShapeletPriorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_n_live(mut self, n_live: usize) -> Self {
        self.n_live = n_live;
        self
    }

    pub fn with_walk_steps(mut self, walk_steps: usize) -> Self {
        self.walk_steps = walk_steps;
        self
    }

    pub fn with_dlogz(mut self, dlogz: f64) -> Self {
        self.dlogz = dlogz;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shapelet_counts(&self) -> &[usize] {
        &self.shapelet_counts
    }

    pub fn polynomial_degree(&self) -> usize {
        self.polynomial_degree
    }

    pub fn policy(&self) -> &ShapeletPriorPolicy {
        &self.policy
    }

    pub fn n_live(&self) -> usize {
        self.n_live
    }

    pub fn walk_steps(&self) -> usize {
        self.walk_steps
    }

    pub fn dlogz(&self) -> f64 {
        self.dlogz
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn validate(&self) -> Result<(), AnalysisError> {
        if self.shapelet_counts.is_empty() {
            return Err(AnalysisError::InvalidConfig {
                reason: "at least one shapelet component is required".to_string(),
            });
        }
        if self.shapelet_counts.iter().any(|&n| n == 0) {
            return Err(AnalysisError::InvalidConfig {
                reason: "shapelet components need at least one coefficient".to_string(),
            });
        }
        if self.label.is_empty() {
            return Err(AnalysisError::InvalidConfig {
                reason: "label must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::new(3).validate().is_ok());
    }

    #[test]
    fn empty_component_list_is_rejected() {
        let config = AnalysisConfig::new(3).with_shapelet_counts(vec![]);
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn zero_coefficient_component_is_rejected() {
        let config = AnalysisConfig::new(3).with_shapelet_counts(vec![2, 0]);
        assert!(config.validate().is_err());
    }
}
