use corella_inference::EngineError;
use corella_model::ModelError;
use corella_prior::PriorError;
use thiserror::Error;

/// Errors raised while configuring or preparing an analysis.
///
/// Engine failures during sampling are not errors at this level; they are
/// reported per run through [`crate::RunReport::Failed`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid analysis configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Prior(#[from] PriorError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = AnalysisError::InvalidConfig {
            reason: "no shapelet components".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid analysis configuration: no shapelet components"
        );
    }
}
