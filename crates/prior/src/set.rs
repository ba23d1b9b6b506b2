//! The combined prior dictionary.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PriorError;
use crate::prior::Prior;

/// An insertion-ordered map from parameter name to [`Prior`].
///
/// The insertion order is the canonical parameter ordering: every flat
/// parameter vector handed to a likelihood or returned by a sampler is laid
/// out in this order. Duplicate names are rejected at insertion, so a fully
/// assembled `PriorSet` is guaranteed collision-free.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorSet {
    entries: Vec<(String, Prior)>,
}

impl PriorSet {
    /// Creates an empty prior set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no parameters are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a named prior.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::NameCollision`] when `name` is already present.
    pub fn insert(&mut self, name: impl Into<String>, prior: Prior) -> Result<(), PriorError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(PriorError::NameCollision { name });
        }
        self.entries.push((name, prior));
        Ok(())
    }

    /// Appends all entries of `other`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::NameCollision`] on the first duplicate; entries
    /// before the duplicate are kept.
    pub fn extend(&mut self, other: PriorSet) -> Result<(), PriorError> {
        for (name, prior) in other.entries {
            self.insert(name, prior)?;
        }
        Ok(())
    }

    /// Returns true when `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Looks up a prior by name.
    pub fn get(&self, name: &str) -> Option<&Prior> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Returns the parameter names in canonical order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterates over `(name, prior)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prior)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Maps a unit-cube point to parameter values, in canonical order.
    ///
    /// # Panics
    ///
    /// Panics if `unit.len() != self.len()` (callers size the cube from
    /// [`PriorSet::len`]).
    pub fn rescale_vector(&self, unit: &[f64]) -> Vec<f64> {
        assert_eq!(
            unit.len(),
            self.entries.len(),
            "rescale_vector: unit-cube dimension mismatch"
        );
        self.entries
            .iter()
            .zip(unit.iter())
            .map(|((_, prior), &u)| prior.rescale(u))
            .collect()
    }

    /// Draws one value per parameter, returned as a name-to-value map.
    pub fn sample_map<R: Rng + ?Sized>(&self, rng: &mut R) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(name, prior)| (name.clone(), prior.sample(rng)))
            .collect()
    }

    /// Sums the log prior probability over a canonical-order value vector.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != self.len()`.
    pub fn ln_prob(&self, values: &[f64]) -> f64 {
        assert_eq!(
            values.len(),
            self.entries.len(),
            "ln_prob: value vector dimension mismatch"
        );
        self.entries
            .iter()
            .zip(values.iter())
            .map(|((_, prior), &v)| prior.ln_prob(v))
            .sum()
    }
}
