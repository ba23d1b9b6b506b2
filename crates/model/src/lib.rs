//! # corella-model
//!
//! Parametric flux models for single-pulse analysis.
//!
//! The overall flux is a sum of named, parameterised components:
//! [`ShapeletFlux`] terms model localised pulses on a Hermite-function
//! basis, and a [`PolynomialFlux`] models the slowly varying baseline.
//! Components combine by addition into a [`CompositeFluxModel`] whose
//! parameter set is the disjoint union of its constituents' names.
//!
//! Models are structurally immutable: parameter values are never stored,
//! every evaluation receives a fresh name-to-value map.
//!
//! ## Two Usage Paths
//!
//! **Single pulse** (unlabelled keys `beta`, `toa`, `C0..`):
//! ```ignore
//! let model = FluxModel::shapelet(3, policy)?
//!     .combine(FluxModel::polynomial(1, data.mid_time()))?;
//! ```
//!
//! **Multiple pulse components** (label-suffixed keys `beta_S0`, ...):
//! ```ignore
//! let s0 = FluxModel::labelled_shapelet(2, "S0", policy_a)?;
//! let s1 = FluxModel::labelled_shapelet(3, "S1", policy_b)?;
//! let model = CompositeFluxModel::new(vec![s0, s1, baseline])?;
//! ```

mod composite;
mod error;
mod hermite;
mod policy;
mod polynomial;
mod shapelet;

use std::collections::BTreeMap;

pub use composite::{CompositeFluxModel, FluxModel};
pub use error::ModelError;
pub use hermite::{hermite, hermite_series};
pub use policy::{BetaPriorKind, ShapeletPriorPolicy, ToaCentre, ToaPolicy};
pub use polynomial::PolynomialFlux;
pub use shapelet::ShapeletFlux;

/// Name-to-value map handed to every flux evaluation.
pub type ParamMap = BTreeMap<String, f64>;
