use corella_data::TimeSeries;
use corella_model::{CompositeFluxModel, ParamMap};
use corella_prior::PriorSet;
use tracing::debug;

use crate::engine::LogLikelihood;
use crate::error::EngineError;

/// Name of the fitted noise-amplitude parameter.
pub const SIGMA_KEY: &str = "sigma";

/// Where the per-sample noise amplitude comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoiseModel {
    /// Use the uncertainty column carried by the data.
    Known,
    /// Fit a single amplitude shared by every sample.
    Fitted,
}

/// Gaussian likelihood of a flux model against a time series.
///
/// The parameter vector handed to [`LogLikelihood::log_likelihood`] follows
/// the insertion order of the prior set the likelihood was built with.
#[derive(Clone, Debug)]
pub struct FluxLikelihood {
    data: TimeSeries,
    model: CompositeFluxModel,
    names: Vec<String>,
    noise: NoiseModel,
    sigma_index: Option<usize>,
}

impl FluxLikelihood {
    pub fn new(
        data: TimeSeries,
        model: CompositeFluxModel,
        priors: &PriorSet,
        noise: NoiseModel,
    ) -> Result<Self, EngineError> {
        let names: Vec<String> = priors.names().iter().map(|s| s.to_string()).collect();
        for name in model.parameter_names() {
            if !priors.contains(name) {
                return Err(EngineError::MissingParameterPrior {
                    name: name.to_string(),
                });
            }
        }
        let sigma_index = match noise {
            NoiseModel::Known => {
                if data.uncertainty().is_none() {
                    return Err(EngineError::MissingUncertainty);
                }
                None
            }
            NoiseModel::Fitted => {
                let index = names.iter().position(|n| n == SIGMA_KEY).ok_or_else(|| {
                    EngineError::MissingNoisePrior {
                        name: SIGMA_KEY.to_string(),
                    }
                })?;
                Some(index)
            }
        };
        Ok(Self {
            data,
            model,
            names,
            noise,
            sigma_index,
        })
    }

    pub fn data(&self) -> &TimeSeries {
        &self.data
    }

    pub fn model(&self) -> &CompositeFluxModel {
        &self.model
    }

    pub fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    /// Parameter names in the order the likelihood expects them.
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    /// Pair a parameter vector with its names.
    pub fn param_map(&self, params: &[f64]) -> ParamMap {
        self.names
            .iter()
            .cloned()
            .zip(params.iter().copied())
            .collect()
    }

    fn gaussian_ln_prob(residual: f64, sigma: f64) -> f64 {
        let z = residual / sigma;
        -0.5 * (z * z + (2.0 * std::f64::consts::PI * sigma * sigma).ln())
    }
}

impl LogLikelihood for FluxLikelihood {
    fn dimension(&self) -> usize {
        self.names.len()
    }

    fn log_likelihood(&self, params: &[f64]) -> f64 {
        debug_assert_eq!(params.len(), self.names.len());
        let map = self.param_map(params);
        let flux = match self.model.evaluate(&map, self.data.time()) {
            Ok(flux) => flux,
            Err(err) => {
                debug!(error = %err, "model evaluation failed, clamping likelihood");
                return f64::NEG_INFINITY;
            }
        };
        if flux.iter().any(|f| !f.is_finite()) {
            debug!("non-finite model flux, clamping likelihood to -inf");
            return f64::NEG_INFINITY;
        }

        let observed = self.data.flux();
        let mut total = 0.0;
        match self.sigma_index {
            Some(index) => {
                let sigma = params[index];
                if sigma <= 0.0 || !sigma.is_finite() {
                    debug!(sigma, "non-positive noise amplitude, clamping likelihood");
                    return f64::NEG_INFINITY;
                }
                for (f, o) in flux.iter().zip(observed) {
                    total += Self::gaussian_ln_prob(o - f, sigma);
                }
            }
            None => {
                // Validated at construction.
                let uncertainty = self.data.uncertainty().unwrap_or(&[]);
                for ((f, o), s) in flux.iter().zip(observed).zip(uncertainty) {
                    total += Self::gaussian_ln_prob(o - f, *s);
                }
            }
        }
        if total.is_finite() {
            total
        } else {
            debug!("non-finite likelihood sum, clamping to -inf");
            f64::NEG_INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use corella_model::{FluxModel, ShapeletPriorPolicy};

    fn flat_series(uncertainty: Option<Vec<f64>>) -> TimeSeries {
        let time: Vec<f64> = (0..32).map(|i| i as f64 * 0.125).collect();
        let flux = vec![0.5; 32];
        TimeSeries::new(time, flux, uncertainty).unwrap()
    }

    // Non-constant flux so the default coefficient slabs have positive width.
    fn ramp_series(uncertainty: Option<Vec<f64>>) -> TimeSeries {
        let time: Vec<f64> = (0..32).map(|i| i as f64 * 0.125).collect();
        let flux: Vec<f64> = (0..32).map(|i| 0.4 + 0.01 * i as f64).collect();
        TimeSeries::new(time, flux, uncertainty).unwrap()
    }

    fn shapelet_model(data: &TimeSeries) -> (CompositeFluxModel, PriorSet) {
        let model = FluxModel::shapelet(2, ShapeletPriorPolicy::new())
            .unwrap()
            .combine(FluxModel::polynomial(0, data.mid_time()))
            .unwrap();
        let priors = model.priors(data).unwrap();
        (model, priors)
    }

    #[test]
    fn known_noise_requires_uncertainty_column() {
        let data = ramp_series(None);
        let (model, priors) = shapelet_model(&data);
        let err = FluxLikelihood::new(data, model, &priors, NoiseModel::Known).unwrap_err();
        assert!(matches!(err, EngineError::MissingUncertainty));
    }

    #[test]
    fn fitted_noise_requires_sigma_prior() {
        let data = ramp_series(Some(vec![0.1; 32]));
        let (model, priors) = shapelet_model(&data);
        let err = FluxLikelihood::new(data, model, &priors, NoiseModel::Fitted).unwrap_err();
        assert!(matches!(err, EngineError::MissingNoisePrior { .. }));
    }

    #[test]
    fn missing_model_prior_is_rejected() {
        let data = ramp_series(Some(vec![0.1; 32]));
        let (model, _) = shapelet_model(&data);
        let priors = PriorSet::new();
        let err = FluxLikelihood::new(data, model, &priors, NoiseModel::Known).unwrap_err();
        assert!(matches!(err, EngineError::MissingParameterPrior { .. }));
    }

    #[test]
    fn perfect_fit_matches_gaussian_normalisation() {
        // A zero-degree polynomial reproducing constant flux exactly leaves
        // only the normalisation term of the Gaussian.
        let data = flat_series(Some(vec![0.1; 32]));
        let model = CompositeFluxModel::new(vec![FluxModel::polynomial(0, data.mid_time())])
            .unwrap();
        let priors = model.priors(&data).unwrap();
        let likelihood =
            FluxLikelihood::new(data, model, &priors, NoiseModel::Known).unwrap();

        let names = likelihood.parameter_names().to_vec();
        let params: Vec<f64> = names
            .iter()
            .map(|n| if n == "B0" { 0.5 } else { 0.0 })
            .collect();
        let expected: f64 =
            -0.5 * 32.0 * (2.0 * std::f64::consts::PI * 0.1f64 * 0.1).ln();
        assert_relative_eq!(
            likelihood.log_likelihood(&params),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn degenerate_width_clamps_to_negative_infinity() {
        let data = ramp_series(Some(vec![0.1; 32]));
        let (model, priors) = shapelet_model(&data);
        let likelihood =
            FluxLikelihood::new(data, model, &priors, NoiseModel::Known).unwrap();

        let params: Vec<f64> = likelihood
            .parameter_names()
            .iter()
            .map(|n| match n.as_str() {
                "beta" => 0.0,
                "C0" | "C1" => 1.0,
                "toa" => 2.0,
                _ => 0.0,
            })
            .collect();
        assert_eq!(likelihood.log_likelihood(&params), f64::NEG_INFINITY);
    }

    #[test]
    fn fitted_noise_rejects_zero_sigma() {
        let data = flat_series(None);
        let model = CompositeFluxModel::new(vec![FluxModel::polynomial(0, data.mid_time())])
            .unwrap();
        let mut priors = model.priors(&data).unwrap();
        priors
            .insert(SIGMA_KEY, corella_prior::Prior::uniform(0.0, 1.0).unwrap())
            .unwrap();
        let likelihood =
            FluxLikelihood::new(data, model, &priors, NoiseModel::Fitted).unwrap();

        let params: Vec<f64> = likelihood
            .parameter_names()
            .iter()
            .map(|n| if n == SIGMA_KEY { 0.0 } else { 0.5 })
            .collect();
        assert_eq!(likelihood.log_likelihood(&params), f64::NEG_INFINITY);
    }
}
