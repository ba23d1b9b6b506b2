use thiserror::Error;

/// Errors raised while assembling a likelihood or running the sampler.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("data carries no per-sample uncertainties but the noise model expects them")]
    MissingUncertainty,

    #[error("noise amplitude '{name}' has no prior")]
    MissingNoisePrior { name: String },

    #[error("model parameter '{name}' has no prior")]
    MissingParameterPrior { name: String },

    #[error("prior set is empty, nothing to sample")]
    EmptyPriorSet,

    #[error("parameter vector has length {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(
        "could not seed a live point with finite likelihood after {attempts} draws"
    )]
    NoViableLivePoint { attempts: usize },

    #[error(
        "sampler hit the iteration cap of {max_iterations} with {remaining:.3} nats of evidence unaccounted for"
    )]
    IterationCapReached { max_iterations: usize, remaining: f64 },
}
