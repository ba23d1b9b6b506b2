//! CSV loading for time-domain flux data.
//!
//! The expected layout is a headed CSV with at least `time` and `flux`
//! columns. An optional `flux_err` column supplies per-sample uncertainties
//! and an optional `pulse_number` column allows selecting a single pulse
//! from a multi-pulse file. Rows are sorted by time before validation, so
//! files need not be pre-sorted (duplicate times are still rejected).

use std::path::Path;

use tracing::info;

use crate::error::DataError;
use crate::series::TimeSeries;

/// Configuration for [`read_csv`].
#[derive(Clone, Debug, Default)]
pub struct ReaderConfig {
    pulse_number: Option<i64>,
}

impl ReaderConfig {
    /// Creates a configuration with no pulse-number filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects only rows whose `pulse_number` column matches.
    pub fn with_pulse_number(mut self, pulse_number: i64) -> Self {
        self.pulse_number = Some(pulse_number);
        self
    }

    /// Returns the configured pulse-number filter.
    pub fn pulse_number(&self) -> Option<i64> {
        self.pulse_number
    }
}

/// Reads a [`TimeSeries`] from a CSV file.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`DataError::Csv`] | file missing or malformed CSV |
/// | [`DataError::MissingColumn`] | no `time`/`flux` header, or a filter on a file without `pulse_number` |
/// | [`DataError::EmptySelection`] | pulse-number filter matches nothing |
/// | [`DataError::InsufficientData`] and friends | the selected rows fail [`TimeSeries::new`] validation |
pub fn read_csv(path: &Path, config: &ReaderConfig) -> Result<TimeSeries, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataError::MissingColumn {
                column: name,
                path: path.to_path_buf(),
            })
    };

    let time_col = column("time")?;
    let flux_col = column("flux")?;
    let err_col = headers.iter().position(|h| h.trim() == "flux_err");
    let pulse_col = headers.iter().position(|h| h.trim() == "pulse_number");
    if config.pulse_number.is_some() && pulse_col.is_none() {
        return Err(DataError::MissingColumn {
            column: "pulse_number",
            path: path.to_path_buf(),
        });
    }

    // (time, flux, sigma) triples; sigma unused when the column is absent.
    let mut rows: Vec<(f64, f64, f64)> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if let (Some(filter), Some(col)) = (config.pulse_number, pulse_col) {
            let pulse = record
                .get(col)
                .and_then(|s| s.trim().parse::<i64>().ok());
            if pulse != Some(filter) {
                continue;
            }
        }
        let time = parse_f64(&record, time_col);
        let flux = parse_f64(&record, flux_col);
        let sigma = err_col.map(|c| parse_f64(&record, c)).unwrap_or(f64::NAN);
        rows.push((time, flux, sigma));
    }

    if rows.is_empty() {
        if let Some(pulse_number) = config.pulse_number {
            return Err(DataError::EmptySelection {
                pulse_number,
                path: path.to_path_buf(),
            });
        }
        return Err(DataError::InsufficientData { n: 0 });
    }

    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let time: Vec<f64> = rows.iter().map(|r| r.0).collect();
    let flux: Vec<f64> = rows.iter().map(|r| r.1).collect();
    let uncertainty = err_col.map(|_| rows.iter().map(|r| r.2).collect());

    let data = TimeSeries::new(time, flux, uncertainty)?;
    info!(
        path = %path.display(),
        n = data.len(),
        has_uncertainty = data.uncertainty().is_some(),
        "loaded flux time series"
    );
    Ok(data)
}

/// Parses a field as f64, mapping absent or malformed entries to NaN so the
/// series validator reports them with an index.
fn parse_f64(record: &csv::StringRecord, col: usize) -> f64 {
    record
        .get(col)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(f64::NAN)
}
