//! The validated time-domain flux container.

use crate::error::DataError;

/// An immutable, validated time series of flux measurements.
///
/// Holds `(time, flux)` samples with optional per-sample flux uncertainties.
/// Invariants (checked once, at construction):
///
/// - at least two samples
/// - all arrays equal length
/// - all values finite
/// - times strictly increasing
///
/// There are no mutating methods; derived views such as [`TimeSeries::truncated`]
/// return a fresh instance.
#[derive(Clone, Debug)]
pub struct TimeSeries {
    time: Vec<f64>,
    flux: Vec<f64>,
    uncertainty: Option<Vec<f64>>,
}

impl TimeSeries {
    /// Creates a validated `TimeSeries` from raw columns.
    ///
    /// `uncertainty`, when present, must align with `time` and be finite;
    /// zero or negative uncertainties are rejected as non-finite information.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`DataError::InsufficientData`] | fewer than two samples |
    /// | [`DataError::LengthMismatch`] | array lengths disagree |
    /// | [`DataError::NonFinite`] | any NaN/infinite value, or sigma <= 0 |
    /// | [`DataError::NonMonotonicTime`] | repeated or decreasing times |
    pub fn new(
        time: Vec<f64>,
        flux: Vec<f64>,
        uncertainty: Option<Vec<f64>>,
    ) -> Result<Self, DataError> {
        let n = time.len();
        if n < 2 {
            return Err(DataError::InsufficientData { n });
        }
        if flux.len() != n {
            return Err(DataError::LengthMismatch {
                time: n,
                name: "flux",
                len: flux.len(),
            });
        }
        if let Some(sigma) = &uncertainty {
            if sigma.len() != n {
                return Err(DataError::LengthMismatch {
                    time: n,
                    name: "uncertainty",
                    len: sigma.len(),
                });
            }
        }

        check_finite(&time, "time")?;
        check_finite(&flux, "flux")?;
        if let Some(sigma) = &uncertainty {
            check_finite(sigma, "uncertainty")?;
            if let Some(index) = sigma.iter().position(|&s| s <= 0.0) {
                return Err(DataError::NonFinite {
                    name: "uncertainty",
                    index,
                });
            }
        }

        for i in 1..n {
            if time[i] <= time[i - 1] {
                return Err(DataError::NonMonotonicTime {
                    index: i,
                    prev: time[i - 1],
                    next: time[i],
                });
            }
        }

        Ok(Self {
            time,
            flux,
            uncertainty,
        })
    }

    /// Returns the time array.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Returns the flux array.
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Returns the per-sample flux uncertainties, if loaded.
    pub fn uncertainty(&self) -> Option<&[f64]> {
        self.uncertainty.as_deref()
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false: construction requires at least two samples.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first sample time.
    pub fn start(&self) -> f64 {
        self.time[0]
    }

    /// Returns the last sample time.
    pub fn end(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    /// Returns the observation span `end - start`.
    pub fn duration(&self) -> f64 {
        self.end() - self.start()
    }

    /// Returns the midpoint of the observation span.
    pub fn mid_time(&self) -> f64 {
        0.5 * (self.start() + self.end())
    }

    /// Returns the spacing between the first two samples.
    pub fn time_step(&self) -> f64 {
        self.time[1] - self.time[0]
    }

    /// Returns the maximum flux.
    pub fn max_flux(&self) -> f64 {
        self.flux.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the minimum flux.
    pub fn min_flux(&self) -> f64 {
        self.flux.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Returns `max_flux - min_flux`.
    pub fn flux_range(&self) -> f64 {
        self.max_flux() - self.min_flux()
    }

    /// Returns the root-mean-square flux.
    pub fn rms_flux(&self) -> f64 {
        let n = self.flux.len() as f64;
        (self.flux.iter().map(|f| f * f).sum::<f64>() / n).sqrt()
    }

    /// Returns the time of the maximum flux sample.
    pub fn peak_time(&self) -> f64 {
        let mut best = 0;
        for (i, &f) in self.flux.iter().enumerate() {
            if f > self.flux[best] {
                best = i;
            }
        }
        self.time[best]
    }

    /// Naive estimate of the pulse arrival time.
    ///
    /// Mean of the times where `|flux|` exceeds `fraction * max_flux`.
    /// Falls back to [`TimeSeries::peak_time`] when no sample qualifies
    /// (possible when the maximum flux is negative).
    pub fn estimate_pulse_time(&self, fraction: f64) -> f64 {
        let threshold = fraction * self.max_flux();
        let mut sum = 0.0;
        let mut count = 0usize;
        for (t, f) in self.time.iter().zip(self.flux.iter()) {
            if f.abs() > threshold {
                sum += t;
                count += 1;
            }
        }
        if count == 0 {
            self.peak_time()
        } else {
            sum / count as f64
        }
    }

    /// Returns a new series keeping samples within `width * duration` of the
    /// mid-time.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InsufficientData`] when fewer than two samples
    /// survive the cut.
    pub fn truncated(&self, width: f64) -> Result<Self, DataError> {
        let mid = self.mid_time();
        let half = width * self.duration();
        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| (self.time[i] - mid).abs() < half)
            .collect();

        Self::new(
            keep.iter().map(|&i| self.time[i]).collect(),
            keep.iter().map(|&i| self.flux[i]).collect(),
            self.uncertainty
                .as_ref()
                .map(|sigma| keep.iter().map(|&i| sigma[i]).collect()),
        )
    }
}

fn check_finite(values: &[f64], name: &'static str) -> Result<(), DataError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DataError::NonFinite { name, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> TimeSeries {
        let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let flux: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        TimeSeries::new(time, flux, None).unwrap()
    }

    #[test]
    fn accessors() {
        let data = ramp(11);
        assert_eq!(data.len(), 11);
        assert_relative_eq!(data.start(), 0.0);
        assert_relative_eq!(data.end(), 10.0);
        assert_relative_eq!(data.duration(), 10.0);
        assert_relative_eq!(data.mid_time(), 5.0);
        assert_relative_eq!(data.time_step(), 1.0);
        assert_relative_eq!(data.max_flux(), 5.0);
        assert_relative_eq!(data.min_flux(), 0.0);
        assert_relative_eq!(data.flux_range(), 5.0);
    }

    #[test]
    fn peak_time_at_maximum() {
        let time = vec![0.0, 1.0, 2.0, 3.0];
        let flux = vec![0.1, 0.9, 0.3, 0.2];
        let data = TimeSeries::new(time, flux, None).unwrap();
        assert_relative_eq!(data.peak_time(), 1.0);
    }

    #[test]
    fn estimate_pulse_time_symmetric_pulse() {
        let n = 1001;
        let time: Vec<f64> = (0..n).map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64).collect();
        let flux: Vec<f64> = time.iter().map(|t| (-t * t / 0.02).exp()).collect();
        let data = TimeSeries::new(time, flux, None).unwrap();
        assert_relative_eq!(data.estimate_pulse_time(0.75), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn too_few_samples() {
        let err = TimeSeries::new(vec![0.0], vec![1.0], None).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData { n: 1 }));
    }

    #[test]
    fn mismatched_lengths() {
        let err = TimeSeries::new(vec![0.0, 1.0], vec![1.0], None).unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { .. }));
    }

    #[test]
    fn mismatched_uncertainty_length() {
        let err =
            TimeSeries::new(vec![0.0, 1.0], vec![1.0, 2.0], Some(vec![0.1])).unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch {
                name: "uncertainty",
                ..
            }
        ));
    }

    #[test]
    fn nan_flux_rejected() {
        let err = TimeSeries::new(vec![0.0, 1.0], vec![1.0, f64::NAN], None).unwrap_err();
        assert!(matches!(err, DataError::NonFinite { name: "flux", index: 1 }));
    }

    #[test]
    fn zero_sigma_rejected() {
        let err =
            TimeSeries::new(vec![0.0, 1.0], vec![1.0, 2.0], Some(vec![0.1, 0.0])).unwrap_err();
        assert!(matches!(
            err,
            DataError::NonFinite {
                name: "uncertainty",
                index: 1
            }
        ));
    }

    #[test]
    fn repeated_time_rejected() {
        let err = TimeSeries::new(vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0], None).unwrap_err();
        assert!(matches!(err, DataError::NonMonotonicTime { index: 2, .. }));
    }

    #[test]
    fn truncated_keeps_centre() {
        let data = ramp(101);
        let cut = data.truncated(0.1).unwrap();
        assert!(cut.len() < data.len());
        assert!(cut.start() >= 40.0);
        assert!(cut.end() <= 60.0);
    }

    #[test]
    fn truncated_too_narrow_errors() {
        let data = ramp(101);
        let err = data.truncated(1e-6).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData { .. }));
    }
}
