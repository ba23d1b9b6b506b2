//! # corella-prior
//!
//! Prior distributions for flux-model parameters.
//!
//! A [`Prior`] is a closed set of distribution variants (uniform,
//! log-uniform, point mass, slab-spike mixture). Every variant supports the
//! unit-interval parameterisation used by nested sampling: [`Prior::rescale`]
//! maps `u in [0, 1]` through the inverse CDF, so a sampler only ever works
//! on the unit hypercube.
//!
//! [`PriorSet`] is the combined prior dictionary for a whole model:
//! an insertion-ordered name-to-prior map whose order defines the canonical
//! layout of flat parameter vectors. Inserting a duplicate name fails —
//! parameter-name collisions are never silently resolved.
//!
//! ## Example
//!
//! ```ignore
//! let mut priors = PriorSet::new();
//! priors.insert("toa", Prior::uniform(0.0, 1.0)?)?;
//! priors.insert("C0", Prior::slab_spike(Prior::uniform(-2.0, 2.0)?, 0.5)?)?;
//! let values = priors.rescale_vector(&[0.3, 0.9]);
//! ```

mod error;
mod prior;
mod set;

pub use error::PriorError;
pub use prior::Prior;
pub use set::PriorSet;
