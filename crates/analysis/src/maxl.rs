//! Deterministic refinement of the best posterior sample.
//!
//! Wraps the `argmin` crate to polish the highest-likelihood posterior draw
//! with a Nelder-Mead descent on the negative log-likelihood, bounded to the
//! prior support.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use corella_inference::{FluxLikelihood, LogLikelihood};
use corella_prior::PriorSet;
use tracing::debug;

struct BoundedCost<'a> {
    likelihood: &'a FluxLikelihood,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl CostFunction for BoundedCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let outside = params
            .iter()
            .zip(&self.lower)
            .zip(&self.upper)
            .any(|((p, lo), hi)| p < lo || p > hi);
        if outside {
            return Ok(f64::MAX);
        }
        let log_l = self.likelihood.log_likelihood(params);
        if log_l.is_finite() {
            Ok(-log_l)
        } else {
            Ok(f64::MAX)
        }
    }
}

/// Polishes `start` inside the prior support; falls back to `start` whenever
/// the descent fails or does not improve the likelihood.
pub(crate) fn refine_max_likelihood(
    likelihood: &FluxLikelihood,
    priors: &PriorSet,
    start: &[f64],
) -> Vec<f64> {
    let lower: Vec<f64> = priors.iter().map(|(_, p)| p.minimum()).collect();
    let upper: Vec<f64> = priors.iter().map(|(_, p)| p.maximum()).collect();

    // One vertex per dimension, nudged by a small fraction of the prior
    // width and kept inside the support.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let width = upper[i] - lower[i];
        let nudge = if width > 0.0 { 1e-3 * width } else { 1e-9 };
        let mut vertex = start.to_vec();
        vertex[i] = (start[i] + nudge).min(upper[i]);
        if vertex[i] == start[i] {
            vertex[i] = (start[i] - nudge).max(lower[i]);
        }
        simplex.push(vertex);
    }

    let start_log_l = likelihood.log_likelihood(start);
    let cost = BoundedCost {
        likelihood,
        lower,
        upper,
    };
    let solver = match NelderMead::new(simplex).with_sd_tolerance(1e-12) {
        Ok(solver) => solver,
        Err(err) => {
            debug!(error = %err, "simplex construction failed, keeping sampler point");
            return start.to_vec();
        }
    };
    let result = match Executor::new(cost, solver)
        .configure(|state| state.max_iters(5000))
        .run()
    {
        Ok(result) => result,
        Err(err) => {
            debug!(error = %err, "refinement failed, keeping sampler point");
            return start.to_vec();
        }
    };
    let best = match result.state().best_param.as_ref() {
        Some(best) => best.clone(),
        None => return start.to_vec(),
    };
    if likelihood.log_likelihood(&best) >= start_log_l {
        best
    } else {
        start.to_vec()
    }
}
