//! Polynomial baseline component.

use corella_data::TimeSeries;
use corella_prior::{Prior, PriorSet};

use crate::error::ModelError;
use crate::ParamMap;

/// Safety factor widening the baseline coefficient priors beyond the raw
/// data-derived scale.
const COEFFICIENT_SCALE: f64 = 2.0;

/// A polynomial baseline flux of fixed degree.
///
/// For degree `n_p` the parameters are `B0..B{n_p}` and the flux is
/// `sum_i B_i (t - t_mid)^i`, with the reference time `t_mid` frozen at
/// construction (the data midpoint), so the parameterisation does not drift
/// with later data slicing.
#[derive(Clone, Debug)]
pub struct PolynomialFlux {
    degree: usize,
    reference_time: f64,
    label: Option<String>,
    coefficient_keys: Vec<String>,
}

impl PolynomialFlux {
    /// Creates a baseline of the given degree referenced to `reference_time`
    /// (conventionally [`TimeSeries::mid_time`]).
    pub fn new(degree: usize, reference_time: f64) -> Self {
        Self::build(degree, reference_time, None)
    }

    /// Creates a labelled baseline with suffixed keys (`B0_BP`, ...).
    pub fn labelled(degree: usize, reference_time: f64, label: impl Into<String>) -> Self {
        Self::build(degree, reference_time, Some(label.into()))
    }

    fn build(degree: usize, reference_time: f64, label: Option<String>) -> Self {
        let coefficient_keys = (0..=degree)
            .map(|i| match &label {
                Some(l) => format!("B{i}_{l}"),
                None => format!("B{i}"),
            })
            .collect();
        Self {
            degree,
            reference_time,
            label,
            coefficient_keys,
        }
    }

    /// Returns the polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the frozen reference time.
    pub fn reference_time(&self) -> f64 {
        self.reference_time
    }

    /// Returns the display name used in logs and results.
    pub fn name(&self) -> String {
        match &self.label {
            Some(l) => format!("baseline[{l}]"),
            None => "baseline".to_string(),
        }
    }

    /// Returns the parameter keys `B0..B{degree}`.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.coefficient_keys.iter().map(|k| k.as_str()).collect()
    }

    /// Evaluates the baseline on `time` (Horner form in `t - t_mid`).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingParameter`] when a key is absent.
    pub fn evaluate(&self, params: &ParamMap, time: &[f64]) -> Result<Vec<f64>, ModelError> {
        let coeffs: Vec<f64> = self
            .coefficient_keys
            .iter()
            .map(|key| {
                params
                    .get(key)
                    .copied()
                    .ok_or_else(|| ModelError::MissingParameter { name: key.clone() })
            })
            .collect::<Result<_, _>>()?;

        Ok(time
            .iter()
            .map(|&t| {
                let dt = t - self.reference_time;
                coeffs.iter().rev().fold(0.0, |acc, &c| acc * dt + c)
            })
            .collect())
    }

    /// Builds the default priors from the data extent.
    ///
    /// Each `B_i` gets a wide zero-centred uniform prior whose half-width is
    /// scaled from the data so the same settings transfer across datasets of
    /// different amplitude: the flux magnitude for `B0`, and
    /// `flux_range / duration^i / i!` for the higher orders (the natural
    /// scale of an i-th derivative over the span).
    ///
    /// # Errors
    ///
    /// Propagates [`corella_prior::PriorError::InvalidRange`] for degenerate
    /// data (zero flux range).
    pub fn default_priors(&self, data: &TimeSeries) -> Result<PriorSet, ModelError> {
        let abs_flux = data.max_flux().abs().max(data.min_flux().abs());
        let mut priors = PriorSet::new();
        let mut factorial = 1.0;
        for (i, key) in self.coefficient_keys.iter().enumerate() {
            if i > 0 {
                factorial *= i as f64;
            }
            let half_width = if i == 0 {
                COEFFICIENT_SCALE * abs_flux
            } else {
                COEFFICIENT_SCALE * data.flux_range() / data.duration().powi(i as i32) / factorial
            };
            priors.insert(key, Prior::uniform(-half_width, half_width)?)?;
        }
        Ok(priors)
    }
}
