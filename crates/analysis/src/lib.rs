//! # corella-analysis
//!
//! Orchestrates the null/full model comparison: builds both models from an
//! [`AnalysisConfig`], samples each independently through an
//! [`InferenceEngine`](corella_inference::InferenceEngine), and assembles a
//! serializable [`AnalysisResult`] with the log Bayes factor, the refined
//! maximum-likelihood parameters and the residual series.
//!
//! Each run moves through an explicit lifecycle:
//! [`RunSetup`] (model + data) → [`PreparedRun`] (collision-free priors +
//! likelihood) → [`RunReport`] (converged or failed). Prior-construction
//! errors abort before sampling; engine failures are terminal per run and
//! never touch the other run.

mod config;
mod error;
mod maxl;
mod result;
mod runner;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use result::{AnalysisResult, RunRecord, RunReport};
pub use runner::{AnalysisRunner, PreparedRun, RunSetup};
