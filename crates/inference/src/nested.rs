use corella_prior::PriorSet;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{debug, info};

use crate::engine::{EngineRun, InferenceEngine, LogLikelihood};
use crate::error::EngineError;

const DEFAULT_N_LIVE: usize = 500;
const DEFAULT_WALK_STEPS: usize = 25;
const DEFAULT_DLOGZ: f64 = 0.1;
const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Nested sampler over the unit hypercube.
///
/// Parameters live in `[0, 1]^d` and are mapped to physical values through
/// the prior set's inverse CDF, so the constrained-prior draw reduces to a
/// random walk accepted whenever the likelihood clears the current threshold.
#[derive(Clone, Debug)]
pub struct NestedSampler {
    n_live: usize,
    walk_steps: usize,
    dlogz: f64,
    max_iterations: usize,
}

impl Default for NestedSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedSampler {
    pub fn new() -> Self {
        Self {
            n_live: DEFAULT_N_LIVE,
            walk_steps: DEFAULT_WALK_STEPS,
            dlogz: DEFAULT_DLOGZ,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Number of live points. More points mean smaller evidence error.
    pub fn with_n_live(mut self, n_live: usize) -> Self {
        self.n_live = n_live.max(2);
        self
    }

    /// Random-walk steps per replacement draw.
    pub fn with_walk_steps(mut self, walk_steps: usize) -> Self {
        self.walk_steps = walk_steps.max(1);
        self
    }

    /// Termination threshold on the remaining evidence, in nats.
    pub fn with_dlogz(mut self, dlogz: f64) -> Self {
        self.dlogz = dlogz.max(1e-6);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
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
}

struct LivePoint {
    unit: Vec<f64>,
    params: Vec<f64>,
    log_l: f64,
}

struct DeadPoint {
    params: Vec<f64>,
    log_l: f64,
    log_wt: f64,
}

fn log_add_exp(a: f64, b: f64) -> f64 {
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    let m = a.max(b);
    m + ((a - m).exp() + (b - m).exp()).ln()
}

fn reflect_into_unit(mut x: f64) -> f64 {
    while x < 0.0 || x > 1.0 {
        if x < 0.0 {
            x = -x;
        }
        if x > 1.0 {
            x = 2.0 - x;
        }
    }
    x
}

impl InferenceEngine for NestedSampler {
    fn run(
        &self,
        likelihood: &dyn LogLikelihood,
        priors: &PriorSet,
        seed: u64,
    ) -> Result<EngineRun, EngineError> {
        let ndim = priors.len();
        if ndim == 0 {
            return Err(EngineError::EmptyPriorSet);
        }
        if likelihood.dimension() != ndim {
            return Err(EngineError::DimensionMismatch {
                expected: likelihood.dimension(),
                got: ndim,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut n_evals: usize = 0;
        let evaluate = |unit: &[f64], n_evals: &mut usize| {
            let params = priors.rescale_vector(unit);
            *n_evals += 1;
            let log_l = likelihood.log_likelihood(&params);
            (params, log_l)
        };

        info!(ndim, n_live = self.n_live, "starting nested sampling run");

        // Seed the live set from the prior, insisting on finite likelihoods.
        let mut live: Vec<LivePoint> = Vec::with_capacity(self.n_live);
        let mut attempts = 0usize;
        let max_attempts = 1000 * self.n_live;
        while live.len() < self.n_live {
            if attempts >= max_attempts {
                return Err(EngineError::NoViableLivePoint { attempts });
            }
            attempts += 1;
            let unit: Vec<f64> = (0..ndim).map(|_| rng.random::<f64>()).collect();
            let (params, log_l) = evaluate(&unit, &mut n_evals);
            if log_l.is_finite() {
                live.push(LivePoint {
                    unit,
                    params,
                    log_l,
                });
            }
        }

        let n_live = self.n_live as f64;
        let log_shell = (1.0 - (-1.0 / n_live).exp()).ln();
        let mut log_z = f64::NEG_INFINITY;
        let mut dead: Vec<DeadPoint> = Vec::new();
        let mut step_scale = 0.1;
        let mut iteration = 0usize;

        loop {
            iteration += 1;
            let worst = live
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.log_l.total_cmp(&b.log_l))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let threshold = live[worst].log_l;

            let log_x_prev = -((iteration - 1) as f64) / n_live;
            let log_wt = log_x_prev + log_shell + threshold;
            log_z = log_add_exp(log_z, log_wt);
            dead.push(DeadPoint {
                params: live[worst].params.clone(),
                log_l: threshold,
                log_wt,
            });

            let log_x = -(iteration as f64) / n_live;
            let log_l_max = live
                .iter()
                .map(|p| p.log_l)
                .fold(f64::NEG_INFINITY, f64::max);
            let remaining = log_add_exp(log_z, log_x + log_l_max) - log_z;
            if remaining < self.dlogz {
                break;
            }
            if iteration >= self.max_iterations {
                return Err(EngineError::IterationCapReached {
                    max_iterations: self.max_iterations,
                    remaining,
                });
            }

            // Replace the worst point with a constrained random walk started
            // from a surviving live point.
            let start = loop {
                let i = rng.random_range(0..live.len());
                if i != worst || live.len() == 1 {
                    break i;
                }
            };
            let mut unit = live[start].unit.clone();
            let mut params = live[start].params.clone();
            let mut log_l = live[start].log_l;
            let mut accepts = 0usize;
            for _ in 0..self.walk_steps {
                let proposal: Vec<f64> = unit
                    .iter()
                    .map(|&u| {
                        let jump: f64 = rng.sample(StandardNormal);
                        reflect_into_unit(u + step_scale * jump)
                    })
                    .collect();
                let (trial_params, trial_log_l) = evaluate(&proposal, &mut n_evals);
                if trial_log_l > threshold {
                    unit = proposal;
                    params = trial_params;
                    log_l = trial_log_l;
                    accepts += 1;
                }
            }
            let ratio = accepts as f64 / self.walk_steps as f64;
            if ratio < 0.2 {
                step_scale = (step_scale * 0.9).max(1e-6);
            } else if ratio > 0.6 {
                step_scale = (step_scale * 1.1).min(1.0);
            }
            live[worst] = LivePoint {
                unit,
                params,
                log_l,
            };

            if iteration % 1000 == 0 {
                debug!(iteration, log_z, remaining, step_scale, "nested sampling progress");
            }
        }

        // Fold the surviving live points into the evidence.
        let log_x_final = -(iteration as f64) / n_live;
        for point in &live {
            let log_wt = log_x_final - n_live.ln() + point.log_l;
            log_z = log_add_exp(log_z, log_wt);
            dead.push(DeadPoint {
                params: point.params.clone(),
                log_l: point.log_l,
                log_wt,
            });
        }

        // Information-based evidence error.
        let mut information = 0.0;
        for point in &dead {
            let w = (point.log_wt - log_z).exp();
            if w > 0.0 && point.log_l.is_finite() {
                information += w * point.log_l;
            }
        }
        information -= log_z;
        let log_z_err = (information.max(0.0) / n_live).sqrt();

        // Systematic resampling to equally weighted posterior draws.
        let weights: Vec<f64> = dead.iter().map(|p| (p.log_wt - log_z).exp()).collect();
        let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
        let n_draws = if sum_sq > 0.0 {
            ((1.0 / sum_sq) as usize).max(1)
        } else {
            1
        };
        let offset: f64 = rng.random::<f64>() / n_draws as f64;
        let mut samples = Array2::zeros((n_draws, ndim));
        let mut log_likelihoods = Vec::with_capacity(n_draws);
        let mut cumulative = 0.0;
        let mut index = 0usize;
        for j in 0..n_draws {
            let target = offset + j as f64 / n_draws as f64;
            while index + 1 < dead.len() && cumulative + weights[index] < target {
                cumulative += weights[index];
                index += 1;
            }
            for (k, value) in dead[index].params.iter().enumerate() {
                samples[(j, k)] = *value;
            }
            log_likelihoods.push(dead[index].log_l);
        }

        info!(
            log_z,
            log_z_err,
            iteration,
            n_evals,
            n_posterior = n_draws,
            "nested sampling run finished"
        );
        Ok(EngineRun::new(
            samples,
            log_likelihoods,
            log_z,
            log_z_err,
            iteration,
            n_evals,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_add_exp_handles_negative_infinity() {
        assert_eq!(log_add_exp(f64::NEG_INFINITY, -1.0), -1.0);
        assert_eq!(log_add_exp(-1.0, f64::NEG_INFINITY), -1.0);
        let both = log_add_exp(0.0, 0.0);
        assert!((both - 2.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn reflection_stays_in_unit_interval() {
        for x in [-0.3, 0.0, 0.4, 1.0, 1.7, 2.4, -2.1] {
            let r = reflect_into_unit(x);
            assert!((0.0..=1.0).contains(&r), "reflected {x} to {r}");
        }
        assert!((reflect_into_unit(1.25) - 0.75).abs() < 1e-12);
        assert!((reflect_into_unit(-0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn builder_clamps_pathological_settings() {
        let sampler = NestedSampler::new()
            .with_n_live(0)
            .with_walk_steps(0)
            .with_dlogz(-1.0)
            .with_max_iterations(0);
        assert_eq!(sampler.n_live(), 2);
        assert_eq!(sampler.walk_steps(), 1);
        assert!(sampler.dlogz() > 0.0);
        assert_eq!(sampler.max_iterations(), 1);
    }
}
