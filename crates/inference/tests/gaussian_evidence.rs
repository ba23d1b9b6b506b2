//! Evidence and posterior checks on problems with known answers.

use corella_inference::{InferenceEngine, LogLikelihood, NestedSampler};
use corella_prior::{Prior, PriorSet};

/// Isotropic Gaussian likelihood centred at the origin.
struct GaussianLikelihood {
    ndim: usize,
    sigma: f64,
}

impl LogLikelihood for GaussianLikelihood {
    fn dimension(&self) -> usize {
        self.ndim
    }

    fn log_likelihood(&self, params: &[f64]) -> f64 {
        let norm = (2.0 * std::f64::consts::PI * self.sigma * self.sigma).ln();
        params
            .iter()
            .map(|x| -0.5 * ((x / self.sigma).powi(2) + norm))
            .sum()
    }
}

fn wide_priors(ndim: usize, half_width: f64) -> PriorSet {
    let mut priors = PriorSet::new();
    for i in 0..ndim {
        priors
            .insert(
                format!("x{i}"),
                Prior::uniform(-half_width, half_width).unwrap(),
            )
            .unwrap();
    }
    priors
}

#[test]
fn one_dimensional_gaussian_evidence() {
    // The likelihood integrates to one, so the evidence is the inverse
    // prior volume: log Z = -ln(20).
    let likelihood = GaussianLikelihood {
        ndim: 1,
        sigma: 1.0,
    };
    let priors = wide_priors(1, 10.0);
    let sampler = NestedSampler::new().with_n_live(400).with_dlogz(0.01);
    let run = sampler.run(&likelihood, &priors, 7).unwrap();

    let expected = -(20.0f64).ln();
    let tolerance = 3.0 * run.log_evidence_err() + 0.1;
    assert!(
        (run.log_evidence() - expected).abs() < tolerance,
        "log Z = {} +/- {}, expected {}",
        run.log_evidence(),
        run.log_evidence_err(),
        expected
    );

    let mean = run.posterior_mean()[0];
    let std = run.posterior_std()[0];
    assert!(mean.abs() < 0.15, "posterior mean {mean} too far from 0");
    assert!((std - 1.0).abs() < 0.2, "posterior std {std} too far from 1");
}

#[test]
fn two_dimensional_gaussian_evidence() {
    let likelihood = GaussianLikelihood {
        ndim: 2,
        sigma: 0.5,
    };
    let priors = wide_priors(2, 5.0);
    let sampler = NestedSampler::new().with_n_live(400).with_dlogz(0.01);
    let run = sampler.run(&likelihood, &priors, 11).unwrap();

    let expected = -2.0 * (10.0f64).ln();
    let tolerance = 3.0 * run.log_evidence_err() + 0.15;
    assert!(
        (run.log_evidence() - expected).abs() < tolerance,
        "log Z = {} +/- {}, expected {}",
        run.log_evidence(),
        run.log_evidence_err(),
        expected
    );
}

#[test]
fn runs_are_deterministic_for_a_fixed_seed() {
    let likelihood = GaussianLikelihood {
        ndim: 1,
        sigma: 1.0,
    };
    let priors = wide_priors(1, 10.0);
    let sampler = NestedSampler::new().with_n_live(100).with_dlogz(0.05);
    let first = sampler.run(&likelihood, &priors, 42).unwrap();
    let second = sampler.run(&likelihood, &priors, 42).unwrap();
    assert_eq!(first.log_evidence(), second.log_evidence());
    assert_eq!(first.n_iterations(), second.n_iterations());
    assert_eq!(first.samples(), second.samples());
}

#[test]
fn dimension_mismatch_is_rejected() {
    let likelihood = GaussianLikelihood {
        ndim: 2,
        sigma: 1.0,
    };
    let priors = wide_priors(1, 10.0);
    let sampler = NestedSampler::new();
    let err = sampler.run(&likelihood, &priors, 0).unwrap_err();
    assert!(err.to_string().contains("length 1, expected 2"));
}

#[test]
fn empty_prior_set_is_rejected() {
    let likelihood = GaussianLikelihood {
        ndim: 0,
        sigma: 1.0,
    };
    let priors = PriorSet::new();
    let err = NestedSampler::new().run(&likelihood, &priors, 0).unwrap_err();
    assert!(err.to_string().contains("empty"));
}
