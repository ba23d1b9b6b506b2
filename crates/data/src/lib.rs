//! # corella-data
//!
//! Time-domain flux data for single-pulse analysis.
//!
//! The central type is [`TimeSeries`]: an immutable, validated sequence of
//! `(time, flux)` samples with optional per-sample flux uncertainties.
//! Construction enforces the invariants the rest of the workspace relies on
//! (strictly increasing times, finite values, aligned lengths), so downstream
//! code never re-validates.
//!
//! ## Two Usage Paths
//!
//! **From arrays** (synthetic data, tests):
//! ```ignore
//! let data = TimeSeries::new(time, flux, None)?;
//! ```
//!
//! **From a CSV file** (observations, optionally filtered by pulse number):
//! ```ignore
//! let data = read_csv(&path, &ReaderConfig::new().with_pulse_number(3))?;
//! ```

mod error;
mod reader;
mod series;

pub use error::DataError;
pub use reader::{read_csv, ReaderConfig};
pub use series::TimeSeries;
