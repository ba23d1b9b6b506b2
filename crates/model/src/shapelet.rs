//! Shapelet pulse component.

use corella_data::TimeSeries;
use corella_prior::{Prior, PriorSet};

use crate::error::ModelError;
use crate::hermite::hermite_series;
use crate::policy::{BetaPriorKind, ShapeletPriorPolicy, ToaCentre, ToaPolicy};
use crate::ParamMap;

/// Fraction of the peak flux used by the automatic pulse-time estimate.
const PULSE_TIME_FRACTION: f64 = 0.75;

/// A localised pulse on a Hermite-function (shapelet) basis.
///
/// For `n_shapelets` terms the parameters are `beta` (width), `toa`
/// (time of arrival), and coefficients `C0..C{n-1}`; the flux is
///
/// ```text
/// x = (t - toa) / beta
/// f(t) = exp(-x^2) * sum_i C_i H_i(x)
/// ```
///
/// with `H_i` the physicists' Hermite polynomials. A labelled component
/// suffixes every key (`beta_S0`, `toa_S0`, `C0_S0`, ...) so several pulses
/// can coexist in one composite model.
#[derive(Clone, Debug)]
pub struct ShapeletFlux {
    n_shapelets: usize,
    label: Option<String>,
    beta_key: String,
    toa_key: String,
    coefficient_keys: Vec<String>,
    policy: ShapeletPriorPolicy,
}

impl ShapeletFlux {
    /// Creates an unlabelled shapelet component with plain keys.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyComponent`] when `n_shapelets` is 0.
    pub fn new(n_shapelets: usize, policy: ShapeletPriorPolicy) -> Result<Self, ModelError> {
        Self::build(n_shapelets, None, policy)
    }

    /// Creates a labelled shapelet component with suffixed keys.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyComponent`] when `n_shapelets` is 0.
    pub fn labelled(
        n_shapelets: usize,
        label: impl Into<String>,
        policy: ShapeletPriorPolicy,
    ) -> Result<Self, ModelError> {
        Self::build(n_shapelets, Some(label.into()), policy)
    }

    fn build(
        n_shapelets: usize,
        label: Option<String>,
        policy: ShapeletPriorPolicy,
    ) -> Result<Self, ModelError> {
        if n_shapelets == 0 {
            return Err(ModelError::EmptyComponent {
                name: label.unwrap_or_else(|| "shapelet".to_string()),
            });
        }
        let suffix = |base: String| match &label {
            Some(l) => format!("{base}_{l}"),
            None => base,
        };
        let coefficient_keys = (0..n_shapelets).map(|i| suffix(format!("C{i}"))).collect();
        Ok(Self {
            n_shapelets,
            beta_key: suffix("beta".to_string()),
            toa_key: suffix("toa".to_string()),
            coefficient_keys,
            label,
            policy,
        })
    }

    /// Returns the number of shapelet terms.
    pub fn n_shapelets(&self) -> usize {
        self.n_shapelets
    }

    /// Returns the component label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the display name used in logs and results.
    pub fn name(&self) -> String {
        match &self.label {
            Some(l) => format!("shapelet[{l}]"),
            None => "shapelet".to_string(),
        }
    }

    /// Returns the parameter keys: beta, toa, then the coefficients.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names = vec![self.beta_key.as_str(), self.toa_key.as_str()];
        names.extend(self.coefficient_keys.iter().map(|k| k.as_str()));
        names
    }

    /// Evaluates the pulse flux on `time`.
    ///
    /// Pure and vectorised; no parameter values are retained. Extreme
    /// parameters (for example `beta -> 0`) may yield non-finite flux;
    /// callers decide how to treat that (the likelihood adapter clamps).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingParameter`] when a key is absent.
    pub fn evaluate(&self, params: &ParamMap, time: &[f64]) -> Result<Vec<f64>, ModelError> {
        let beta = lookup(params, &self.beta_key)?;
        let toa = lookup(params, &self.toa_key)?;
        let coeffs: Vec<f64> = self
            .coefficient_keys
            .iter()
            .map(|k| lookup(params, k))
            .collect::<Result<_, _>>()?;

        Ok(time
            .iter()
            .map(|&t| {
                let x = (t - toa) / beta;
                (-x * x).exp() * hermite_series(&coeffs, x)
            })
            .collect())
    }

    /// Builds the default priors for this component from the data extent.
    ///
    /// - `toa`: uniform over the span, a narrowed window, or one slice of an
    ///   equal-width partition, per the policy.
    /// - `beta`: uniform or log-uniform over `[beta_min, beta_max]`,
    ///   defaulting to `[time_step, duration]`.
    /// - each `C_i`: slab-spike, spike at zero, slab uniform over
    ///   `±max_multiplier * flux_range`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidToaPolicy`] for inconsistent window or
    /// partition settings, and propagates [`corella_prior::PriorError`] for
    /// degenerate ranges (for example constant-flux data).
    pub fn default_priors(&self, data: &TimeSeries) -> Result<PriorSet, ModelError> {
        let mut priors = PriorSet::new();

        let (toa_min, toa_max) = self.toa_bounds(data)?;
        priors.insert(&self.toa_key, Prior::uniform(toa_min, toa_max)?)?;

        let (beta_min_override, beta_max_override) = self.policy.beta_bounds();
        let beta_min = beta_min_override.unwrap_or_else(|| data.time_step());
        let beta_max = beta_max_override.unwrap_or_else(|| data.duration());
        let beta_prior = match self.policy.beta_kind() {
            BetaPriorKind::Uniform => Prior::uniform(beta_min, beta_max)?,
            BetaPriorKind::LogUniform => Prior::log_uniform(beta_min, beta_max)?,
        };
        priors.insert(&self.beta_key, beta_prior)?;

        let half_width = self.policy.max_multiplier() * data.flux_range();
        for key in &self.coefficient_keys {
            let slab = Prior::uniform(-half_width, half_width)?;
            priors.insert(key, Prior::slab_spike(slab, self.policy.mix())?)?;
        }

        Ok(priors)
    }

    fn toa_bounds(&self, data: &TimeSeries) -> Result<(f64, f64), ModelError> {
        match self.policy.toa() {
            ToaPolicy::FullSpan => Ok((data.start(), data.end())),
            ToaPolicy::Window {
                centre,
                width_fraction,
            } => {
                if !(0.0..1.0).contains(&width_fraction) || width_fraction == 0.0 {
                    return Err(ModelError::InvalidToaPolicy {
                        reason: format!("window width fraction {width_fraction} not in (0, 1)"),
                    });
                }
                let t0 = match centre {
                    ToaCentre::Auto => data.estimate_pulse_time(PULSE_TIME_FRACTION),
                    ToaCentre::Fraction(f) => {
                        if !(0.0..=1.0).contains(&f) {
                            return Err(ModelError::InvalidToaPolicy {
                                reason: format!("window centre fraction {f} not in [0, 1]"),
                            });
                        }
                        data.start() + f * data.duration()
                    }
                };
                let dt = width_fraction * data.duration();
                Ok((
                    (t0 - dt).max(data.start()),
                    (t0 + dt).min(data.end()),
                ))
            }
            ToaPolicy::Partition { index, count } => {
                if count == 0 || index >= count {
                    return Err(ModelError::InvalidToaPolicy {
                        reason: format!("partition slice {index} of {count}"),
                    });
                }
                let width = data.duration() / count as f64;
                let lo = data.start() + index as f64 * width;
                Ok((lo, lo + width))
            }
        }
    }
}

fn lookup(params: &ParamMap, key: &str) -> Result<f64, ModelError> {
    params.get(key).copied().ok_or_else(|| ModelError::MissingParameter {
        name: key.to_string(),
    })
}
