//! Prior-construction policy for shapelet components.

/// Shape of the `beta` (pulse width) prior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BetaPriorKind {
    /// Flat over `[beta_min, beta_max]`.
    #[default]
    Uniform,
    /// Flat in `log(beta)` over `[beta_min, beta_max]`.
    LogUniform,
}

/// Where to centre a narrowed time-of-arrival window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToaCentre {
    /// Estimate the pulse time from the data peak.
    Auto,
    /// A fraction of the span, measured from the start time.
    Fraction(f64),
}

/// Time-of-arrival prior policy.
///
/// When several shapelet components share the observation span, their `toa`
/// priors must not overlap or the components become label-degenerate. The
/// `Partition` variant assigns each component one slice of an equal-width
/// disjoint partition; the partition algorithm is a policy choice, not a
/// fixed law, so richer data-driven partitions can be added as variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToaPolicy {
    /// Uniform prior over the whole observation span.
    FullSpan,
    /// Uniform prior over `centre ± width_fraction * duration`, clipped to
    /// the span.
    Window {
        /// Window centre.
        centre: ToaCentre,
        /// Half-width as a fraction of the span, in `(0, 1)`.
        width_fraction: f64,
    },
    /// Slice `index` of an equal-width partition of the span into `count`
    /// disjoint sub-ranges.
    Partition {
        /// Zero-based slice index.
        index: usize,
        /// Total number of slices.
        count: usize,
    },
}

impl Default for ToaPolicy {
    fn default() -> Self {
        Self::FullSpan
    }
}

/// Full prior policy for one shapelet component.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use corella_model::{BetaPriorKind, ShapeletPriorPolicy};
///
/// let policy = ShapeletPriorPolicy::new()
///     .with_mix(0.3)
///     .with_beta_kind(BetaPriorKind::LogUniform);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeletPriorPolicy {
    mix: f64,
    max_multiplier: f64,
    beta_min: Option<f64>,
    beta_max: Option<f64>,
    beta_kind: BetaPriorKind,
    toa: ToaPolicy,
}

impl ShapeletPriorPolicy {
    /// Creates a policy with defaults.
    ///
    /// Defaults: `mix = 0.5`, `max_multiplier = 1.0`, beta bounds derived
    /// from the data (`[time_step, duration]`), uniform beta prior, full-span
    /// toa prior.
    pub fn new() -> Self {
        Self {
            mix: 0.5,
            max_multiplier: 1.0,
            beta_min: None,
            beta_max: None,
            beta_kind: BetaPriorKind::default(),
            toa: ToaPolicy::default(),
        }
    }

    /// Sets the slab-spike mixing fraction for the coefficients.
    pub fn with_mix(mut self, mix: f64) -> Self {
        self.mix = mix;
        self
    }

    /// Sets the multiplier on the flux range for the coefficient slab width.
    pub fn with_max_multiplier(mut self, max_multiplier: f64) -> Self {
        self.max_multiplier = max_multiplier;
        self
    }

    /// Overrides the lower beta bound (default: data time step).
    pub fn with_beta_min(mut self, beta_min: f64) -> Self {
        self.beta_min = Some(beta_min);
        self
    }

    /// Overrides the upper beta bound (default: data duration).
    pub fn with_beta_max(mut self, beta_max: f64) -> Self {
        self.beta_max = Some(beta_max);
        self
    }

    /// Sets the beta prior shape.
    pub fn with_beta_kind(mut self, beta_kind: BetaPriorKind) -> Self {
        self.beta_kind = beta_kind;
        self
    }

    /// Sets the time-of-arrival policy.
    pub fn with_toa(mut self, toa: ToaPolicy) -> Self {
        self.toa = toa;
        self
    }

    /// Returns the slab-spike mixing fraction.
    pub fn mix(&self) -> f64 {
        self.mix
    }

    /// Returns the coefficient slab-width multiplier.
    pub fn max_multiplier(&self) -> f64 {
        self.max_multiplier
    }

    /// Returns the beta bound overrides.
    pub fn beta_bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.beta_min, self.beta_max)
    }

    /// Returns the beta prior shape.
    pub fn beta_kind(&self) -> BetaPriorKind {
        self.beta_kind
    }

    /// Returns the time-of-arrival policy.
    pub fn toa(&self) -> ToaPolicy {
        self.toa
    }
}

impl Default for ShapeletPriorPolicy {
    fn default() -> Self {
        Self::new()
    }
}
