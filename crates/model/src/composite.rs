//! Composite (additive) flux models.

use std::collections::BTreeSet;

use corella_data::TimeSeries;
use corella_prior::PriorSet;

use crate::error::ModelError;
use crate::policy::ShapeletPriorPolicy;
use crate::polynomial::PolynomialFlux;
use crate::shapelet::ShapeletFlux;
use crate::ParamMap;

/// One additive term of the overall flux function.
///
/// The variant set is fixed and small (pulse shapelets and a polynomial
/// baseline), so this is a closed enum rather than an open trait object.
#[derive(Clone, Debug)]
pub enum FluxModel {
    /// A localised pulse component.
    Shapelet(ShapeletFlux),
    /// A slowly varying baseline component.
    Polynomial(PolynomialFlux),
}

impl FluxModel {
    /// Creates an unlabelled shapelet component.
    pub fn shapelet(n_shapelets: usize, policy: ShapeletPriorPolicy) -> Result<Self, ModelError> {
        Ok(Self::Shapelet(ShapeletFlux::new(n_shapelets, policy)?))
    }

    /// Creates a labelled shapelet component.
    pub fn labelled_shapelet(
        n_shapelets: usize,
        label: impl Into<String>,
        policy: ShapeletPriorPolicy,
    ) -> Result<Self, ModelError> {
        Ok(Self::Shapelet(ShapeletFlux::labelled(
            n_shapelets,
            label,
            policy,
        )?))
    }

    /// Creates a polynomial baseline component.
    pub fn polynomial(degree: usize, reference_time: f64) -> Self {
        Self::Polynomial(PolynomialFlux::new(degree, reference_time))
    }

    /// Returns the display name used in logs and results.
    pub fn name(&self) -> String {
        match self {
            Self::Shapelet(s) => s.name(),
            Self::Polynomial(p) => p.name(),
        }
    }

    /// Returns the parameter keys in component order.
    pub fn parameter_names(&self) -> Vec<&str> {
        match self {
            Self::Shapelet(s) => s.parameter_names(),
            Self::Polynomial(p) => p.parameter_names(),
        }
    }

    /// True for pulse-shaped components (shapelets), false for baselines.
    ///
    /// The null model of an analysis keeps only the non-pulse components.
    pub fn is_pulse(&self) -> bool {
        matches!(self, Self::Shapelet(_))
    }

    /// Evaluates this component's flux on `time`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingParameter`] when a key is absent from
    /// `params`.
    pub fn evaluate(&self, params: &ParamMap, time: &[f64]) -> Result<Vec<f64>, ModelError> {
        match self {
            Self::Shapelet(s) => s.evaluate(params, time),
            Self::Polynomial(p) => p.evaluate(params, time),
        }
    }

    /// Builds this component's default priors from the data extent.
    pub fn default_priors(&self, data: &TimeSeries) -> Result<PriorSet, ModelError> {
        match self {
            Self::Shapelet(s) => s.default_priors(data),
            Self::Polynomial(p) => p.default_priors(data),
        }
    }

    /// Combines two components into a composite.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NameCollision`] when the parameter name sets
    /// intersect.
    pub fn combine(self, other: FluxModel) -> Result<CompositeFluxModel, ModelError> {
        CompositeFluxModel::new(vec![self, other])
    }
}

/// A sum of [`FluxModel`] components with disjoint parameter names.
///
/// Structure is fixed after construction; evaluation sums constituent
/// outputs elementwise over the same time array.
#[derive(Clone, Debug)]
pub struct CompositeFluxModel {
    components: Vec<FluxModel>,
}

impl CompositeFluxModel {
    /// Builds a composite from components, checking name disjointness.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ModelError::NoComponents`] | empty component list |
    /// | [`ModelError::NameCollision`] | any parameter name appears twice |
    pub fn new(components: Vec<FluxModel>) -> Result<Self, ModelError> {
        if components.is_empty() {
            return Err(ModelError::NoComponents);
        }
        let mut seen = BTreeSet::new();
        for component in &components {
            for name in component.parameter_names() {
                if !seen.insert(name.to_string()) {
                    return Err(ModelError::NameCollision {
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(Self { components })
    }

    /// Appends another component, rechecking disjointness.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NameCollision`] on overlap; `self` is consumed
    /// either way.
    pub fn combine(mut self, other: FluxModel) -> Result<Self, ModelError> {
        self.components.push(other);
        Self::new(self.components)
    }

    /// Returns the components in order.
    pub fn components(&self) -> &[FluxModel] {
        &self.components
    }

    /// Returns all parameter names, in component order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.components
            .iter()
            .flat_map(|c| c.parameter_names())
            .collect()
    }

    /// Evaluates the summed flux on `time`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingParameter`] when any component key is
    /// absent.
    pub fn evaluate(&self, params: &ParamMap, time: &[f64]) -> Result<Vec<f64>, ModelError> {
        let mut total = vec![0.0; time.len()];
        for component in &self.components {
            let flux = component.evaluate(params, time)?;
            for (acc, f) in total.iter_mut().zip(flux) {
                *acc += f;
            }
        }
        Ok(total)
    }

    /// Evaluates the summed flux of pulse components only.
    ///
    /// Returns zeros when the composite has no pulse component (a pure
    /// baseline model).
    pub fn pulse_flux(&self, params: &ParamMap, time: &[f64]) -> Result<Vec<f64>, ModelError> {
        let mut total = vec![0.0; time.len()];
        for component in self.components.iter().filter(|c| c.is_pulse()) {
            let flux = component.evaluate(params, time)?;
            for (acc, f) in total.iter_mut().zip(flux) {
                *acc += f;
            }
        }
        Ok(total)
    }

    /// Assembles the combined prior dictionary from all components.
    ///
    /// # Errors
    ///
    /// Propagates component prior failures; a name collision here is
    /// impossible by construction but would surface as
    /// [`corella_prior::PriorError::NameCollision`].
    pub fn priors(&self, data: &TimeSeries) -> Result<PriorSet, ModelError> {
        let mut priors = PriorSet::new();
        for component in &self.components {
            priors.extend(component.default_priors(data)?)?;
        }
        Ok(priors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::BTreeSet;

    fn params(pairs: &[(&str, f64)]) -> ParamMap {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn shapelet(n: usize) -> FluxModel {
        FluxModel::shapelet(n, ShapeletPriorPolicy::new()).unwrap()
    }

    #[test]
    fn union_of_parameter_names() {
        let composite = shapelet(2).combine(FluxModel::polynomial(1, 0.0)).unwrap();
        let names: BTreeSet<&str> = composite.parameter_names().into_iter().collect();
        let expected: BTreeSet<&str> =
            ["beta", "toa", "C0", "C1", "B0", "B1"].into_iter().collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn collision_between_shapelets() {
        let err = shapelet(2).combine(shapelet(3)).unwrap_err();
        assert!(matches!(err, ModelError::NameCollision { .. }));
    }

    #[test]
    fn labelled_shapelets_coexist() {
        let a = FluxModel::labelled_shapelet(2, "S0", ShapeletPriorPolicy::new()).unwrap();
        let b = FluxModel::labelled_shapelet(2, "S1", ShapeletPriorPolicy::new()).unwrap();
        let composite = a.combine(b).unwrap();
        assert_eq!(composite.parameter_names().len(), 8);
    }

    #[test]
    fn empty_composite_rejected() {
        let err = CompositeFluxModel::new(vec![]).unwrap_err();
        assert!(matches!(err, ModelError::NoComponents));
    }

    #[test]
    fn evaluate_sums_components() {
        let composite = shapelet(1).combine(FluxModel::polynomial(0, 0.0)).unwrap();
        let p = params(&[("beta", 1.0), ("toa", 0.0), ("C0", 2.0), ("B0", 0.5)]);
        let time = [0.0, 1.0];

        let total = composite.evaluate(&p, &time).unwrap();
        let pulse = composite.components()[0].evaluate(&p, &time).unwrap();
        let base = composite.components()[1].evaluate(&p, &time).unwrap();
        for i in 0..time.len() {
            assert_relative_eq!(total[i], pulse[i] + base[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn pulse_flux_excludes_baseline() {
        let composite = shapelet(1).combine(FluxModel::polynomial(0, 0.0)).unwrap();
        let p = params(&[("beta", 1.0), ("toa", 0.0), ("C0", 2.0), ("B0", 0.5)]);
        let pulse = composite.pulse_flux(&p, &[0.0]).unwrap();
        assert_relative_eq!(pulse[0], 2.0);
    }

    #[test]
    fn baseline_only_pulse_flux_is_zero() {
        let composite = CompositeFluxModel::new(vec![FluxModel::polynomial(1, 0.0)]).unwrap();
        let p = params(&[("B0", 0.5), ("B1", 1.0)]);
        assert_eq!(composite.pulse_flux(&p, &[0.0, 1.0]).unwrap(), vec![0.0, 0.0]);
    }
}
