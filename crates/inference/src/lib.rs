//! Likelihoods and sampling engines for flux-model inference.
//!
//! [`FluxLikelihood`] scores a composite flux model against a time series
//! under Gaussian noise, and [`NestedSampler`] estimates the evidence and
//! posterior by nested sampling over the unit hypercube. Alternative engines
//! plug in through the [`InferenceEngine`] trait.

mod engine;
mod error;
mod likelihood;
mod nested;

pub use engine::{EngineRun, InferenceEngine, LogLikelihood};
pub use error::EngineError;
pub use likelihood::{FluxLikelihood, NoiseModel, SIGMA_KEY};
pub use nested::NestedSampler;
