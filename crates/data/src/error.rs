//! Error types for the corella-data crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the corella-data crate.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Returned when fewer than two samples are provided.
    #[error("insufficient data: got {n} samples, need at least 2")]
    InsufficientData {
        /// Number of samples provided.
        n: usize,
    },

    /// Returned when the time, flux, or uncertainty arrays disagree in length.
    #[error("array length mismatch: time has {time}, {name} has {len}")]
    LengthMismatch {
        /// Length of the time array.
        time: usize,
        /// Name of the offending array.
        name: &'static str,
        /// Length of the offending array.
        len: usize,
    },

    /// Returned when any sample contains a non-finite value.
    #[error("non-finite value in {name} at index {index}")]
    NonFinite {
        /// Name of the offending array.
        name: &'static str,
        /// Index of the first non-finite entry.
        index: usize,
    },

    /// Returned when times are not strictly increasing.
    #[error("times not strictly increasing at index {index} ({prev} >= {next})")]
    NonMonotonicTime {
        /// Index of the later of the two offending samples.
        index: usize,
        /// The earlier time value.
        prev: f64,
        /// The later time value.
        next: f64,
    },

    /// Returned when a CSV file cannot be opened or parsed.
    #[error("failed to read {path}: {source}")]
    Csv {
        /// Path of the file being read.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Returned when a required CSV column is absent.
    #[error("missing required column `{column}` in {path}")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
        /// Path of the file being read.
        path: PathBuf,
    },

    /// Returned when a pulse-number filter matches no rows.
    #[error("no rows with pulse_number {pulse_number} in {path}")]
    EmptySelection {
        /// The requested pulse number.
        pulse_number: i64,
        /// Path of the file being read.
        path: PathBuf,
    },
}
