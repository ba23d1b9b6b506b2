//! Error types for the corella-prior crate.

/// Error type for all fallible operations in the corella-prior crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriorError {
    /// Returned when a prior is built with a degenerate or inverted range.
    #[error("invalid prior range [{minimum}, {maximum}]: {reason}")]
    InvalidRange {
        /// Lower bound supplied.
        minimum: f64,
        /// Upper bound supplied.
        maximum: f64,
        /// Why the range was rejected.
        reason: &'static str,
    },

    /// Returned when a slab-spike mixing fraction lies outside `[0, 1]`.
    #[error("invalid mixing fraction {mix}: must lie in [0, 1]")]
    InvalidMixing {
        /// The supplied mixing fraction.
        mix: f64,
    },

    /// Returned when a slab-spike prior is built from an unsupported slab.
    #[error("unsupported slab distribution: {found}, only uniform slabs are supported")]
    UnsupportedSlab {
        /// Variant name of the rejected slab.
        found: &'static str,
    },

    /// Returned when inserting a parameter name that already exists.
    #[error("parameter name collision: `{name}` already present")]
    NameCollision {
        /// The duplicated parameter name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_range() {
        let err = PriorError::InvalidRange {
            minimum: 1.0,
            maximum: 1.0,
            reason: "zero width",
        };
        assert_eq!(err.to_string(), "invalid prior range [1, 1]: zero width");
    }

    #[test]
    fn error_invalid_mixing() {
        let err = PriorError::InvalidMixing { mix: 1.5 };
        assert_eq!(
            err.to_string(),
            "invalid mixing fraction 1.5: must lie in [0, 1]"
        );
    }

    #[test]
    fn error_name_collision() {
        let err = PriorError::NameCollision {
            name: "toa".to_string(),
        };
        assert_eq!(err.to_string(), "parameter name collision: `toa` already present");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<PriorError>();
    }
}
