//! Error types for the corella-model crate.

use corella_prior::PriorError;

/// Error type for all fallible operations in the corella-model crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Returned when combining models whose parameter names intersect.
    #[error("parameter name collision: `{name}` appears in more than one component")]
    NameCollision {
        /// The duplicated parameter name.
        name: String,
    },

    /// Returned when an evaluation is missing a required parameter.
    #[error("missing parameter `{name}` in evaluation map")]
    MissingParameter {
        /// The absent parameter name.
        name: String,
    },

    /// Returned when a component is built with no terms.
    #[error("component `{name}` has no terms (count must be at least 1)")]
    EmptyComponent {
        /// Display name of the offending component.
        name: String,
    },

    /// Returned when a composite is built with no components.
    #[error("composite flux model has no components")]
    NoComponents,

    /// Returned when a time-of-arrival prior policy is inconsistent.
    #[error("invalid toa policy: {reason}")]
    InvalidToaPolicy {
        /// Why the policy was rejected.
        reason: String,
    },

    /// Returned when a default prior cannot be built from the data extent.
    #[error(transparent)]
    Prior(#[from] PriorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_name_collision() {
        let err = ModelError::NameCollision {
            name: "beta".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parameter name collision: `beta` appears in more than one component"
        );
    }

    #[test]
    fn error_missing_parameter() {
        let err = ModelError::MissingParameter {
            name: "C2".to_string(),
        };
        assert_eq!(err.to_string(), "missing parameter `C2` in evaluation map");
    }

    #[test]
    fn error_wraps_prior_error() {
        let prior_err = PriorError::InvalidMixing { mix: -0.5 };
        let err = ModelError::from(prior_err);
        assert_eq!(
            err.to_string(),
            "invalid mixing fraction -0.5: must lie in [0, 1]"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<ModelError>();
    }
}
