//! The closed set of prior distribution variants.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PriorError;

/// A one-dimensional prior distribution.
///
/// The variant set is fixed and small, so this is a tagged enum rather than
/// an open trait. Construct through the checked constructors
/// ([`Prior::uniform`], [`Prior::log_uniform`], [`Prior::delta_at`],
/// [`Prior::slab_spike`]); the fields are kept private so every in-flight
/// `Prior` is known valid.
///
/// For mixed discrete/continuous variants, [`Prior::ln_prob`] reports the
/// probability *mass* at an atom and the density elsewhere, matching how
/// nested-sampling prior dictionaries treat point masses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prior {
    /// Flat density on `[minimum, maximum]`.
    Uniform {
        /// Lower bound.
        minimum: f64,
        /// Upper bound.
        maximum: f64,
    },
    /// Density proportional to `1/x` on `[minimum, maximum]`, `minimum > 0`.
    LogUniform {
        /// Lower bound (positive).
        minimum: f64,
        /// Upper bound.
        maximum: f64,
    },
    /// Point mass at a single value.
    DeltaAt {
        /// The supported value.
        value: f64,
    },
    /// Mixture of a point mass (`spike`, probability `mix`) and a uniform
    /// slab (probability `1 - mix`).
    SlabSpike {
        /// Location of the point mass.
        spike: f64,
        /// Slab lower bound.
        slab_min: f64,
        /// Slab upper bound.
        slab_max: f64,
        /// Probability mass assigned to the spike.
        mix: f64,
    },
}

impl Prior {
    /// Creates a uniform prior on `[minimum, maximum]`.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::InvalidRange`] for non-finite bounds or a
    /// zero-or-negative-width range.
    pub fn uniform(minimum: f64, maximum: f64) -> Result<Self, PriorError> {
        check_range(minimum, maximum)?;
        Ok(Self::Uniform { minimum, maximum })
    }

    /// Creates a log-uniform prior on `[minimum, maximum]`, `minimum > 0`.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::InvalidRange`] for non-finite bounds,
    /// a zero-or-negative-width range, or a non-positive lower bound.
    pub fn log_uniform(minimum: f64, maximum: f64) -> Result<Self, PriorError> {
        check_range(minimum, maximum)?;
        if minimum <= 0.0 {
            return Err(PriorError::InvalidRange {
                minimum,
                maximum,
                reason: "log-uniform support must be positive",
            });
        }
        Ok(Self::LogUniform { minimum, maximum })
    }

    /// Creates a point-mass prior at `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::InvalidRange`] for a non-finite value.
    pub fn delta_at(value: f64) -> Result<Self, PriorError> {
        if !value.is_finite() {
            return Err(PriorError::InvalidRange {
                minimum: value,
                maximum: value,
                reason: "point mass location must be finite",
            });
        }
        Ok(Self::DeltaAt { value })
    }

    /// Creates a point-mass prior at zero.
    pub fn delta_at_zero() -> Self {
        Self::DeltaAt { value: 0.0 }
    }

    /// Creates a slab-spike mixture with the spike fixed at zero.
    ///
    /// `mix` is the probability mass at the spike; the remaining `1 - mix`
    /// goes to `slab`, which must be a [`Prior::Uniform`].
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`PriorError::UnsupportedSlab`] | `slab` is not uniform |
    /// | [`PriorError::InvalidMixing`] | `mix` outside `[0, 1]` or non-finite |
    pub fn slab_spike(slab: Prior, mix: f64) -> Result<Self, PriorError> {
        let (slab_min, slab_max) = match slab {
            Self::Uniform { minimum, maximum } => (minimum, maximum),
            other => {
                return Err(PriorError::UnsupportedSlab {
                    found: other.variant_name(),
                })
            }
        };
        if !(0.0..=1.0).contains(&mix) || !mix.is_finite() {
            return Err(PriorError::InvalidMixing { mix });
        }
        Ok(Self::SlabSpike {
            spike: 0.0,
            slab_min,
            slab_max,
            mix,
        })
    }

    /// Returns the lower edge of the support.
    pub fn minimum(&self) -> f64 {
        match *self {
            Self::Uniform { minimum, .. } | Self::LogUniform { minimum, .. } => minimum,
            Self::DeltaAt { value } => value,
            Self::SlabSpike {
                spike, slab_min, ..
            } => spike.min(slab_min),
        }
    }

    /// Returns the upper edge of the support.
    pub fn maximum(&self) -> f64 {
        match *self {
            Self::Uniform { maximum, .. } | Self::LogUniform { maximum, .. } => maximum,
            Self::DeltaAt { value } => value,
            Self::SlabSpike {
                spike, slab_max, ..
            } => spike.max(slab_max),
        }
    }

    /// Maps `u` from the unit interval through the inverse CDF.
    ///
    /// This is the sampler-facing operation: a nested sampler explores the
    /// unit hypercube and rescales each coordinate through its prior. For
    /// the slab-spike mixture, `u < mix` maps to exactly the spike value and
    /// the residual mass maps affinely onto the slab, so the point mass is
    /// reproduced with the correct frequency by construction.
    ///
    /// `u` outside `[0, 1]` is clamped.
    pub fn rescale(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        match *self {
            Self::Uniform { minimum, maximum } => minimum + u * (maximum - minimum),
            Self::LogUniform { minimum, maximum } => minimum * (maximum / minimum).powf(u),
            Self::DeltaAt { value } => value,
            Self::SlabSpike {
                spike,
                slab_min,
                slab_max,
                mix,
            } => {
                if u < mix || mix >= 1.0 {
                    spike
                } else {
                    let v = (u - mix) / (1.0 - mix);
                    slab_min + v * (slab_max - slab_min)
                }
            }
        }
    }

    /// Draws one value from the prior.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.rescale(rng.random::<f64>())
    }

    /// Returns the log prior probability of `value`.
    ///
    /// Probability mass at atoms (`DeltaAt`, the slab-spike spike), density
    /// elsewhere; `-inf` outside the support.
    pub fn ln_prob(&self, value: f64) -> f64 {
        match *self {
            Self::Uniform { minimum, maximum } => {
                if (minimum..=maximum).contains(&value) {
                    -(maximum - minimum).ln()
                } else {
                    f64::NEG_INFINITY
                }
            }
            Self::LogUniform { minimum, maximum } => {
                if (minimum..=maximum).contains(&value) {
                    // Density 1 / (x * ln(max/min)).
                    -value.ln() - (maximum / minimum).ln().ln()
                } else {
                    f64::NEG_INFINITY
                }
            }
            Self::DeltaAt { value: atom } => {
                if value == atom {
                    0.0
                } else {
                    f64::NEG_INFINITY
                }
            }
            Self::SlabSpike {
                spike,
                slab_min,
                slab_max,
                mix,
            } => {
                if value == spike {
                    mix.ln()
                } else if (slab_min..=slab_max).contains(&value) {
                    (1.0 - mix).ln() - (slab_max - slab_min).ln()
                } else {
                    f64::NEG_INFINITY
                }
            }
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "uniform",
            Self::LogUniform { .. } => "log-uniform",
            Self::DeltaAt { .. } => "delta",
            Self::SlabSpike { .. } => "slab-spike",
        }
    }
}

fn check_range(minimum: f64, maximum: f64) -> Result<(), PriorError> {
    if !minimum.is_finite() || !maximum.is_finite() {
        return Err(PriorError::InvalidRange {
            minimum,
            maximum,
            reason: "bounds must be finite",
        });
    }
    if maximum <= minimum {
        return Err(PriorError::InvalidRange {
            minimum,
            maximum,
            reason: "zero or negative width",
        });
    }
    Ok(())
}
