//! Integration tests for the CSV reader.

use std::io::Write;

use corella_data::{read_csv, DataError, ReaderConfig};
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn reads_time_and_flux() {
    let file = write_csv("time,flux\n0.0,1.0\n1.0,2.0\n2.0,1.5\n");
    let data = read_csv(file.path(), &ReaderConfig::new()).unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data.time(), &[0.0, 1.0, 2.0]);
    assert_eq!(data.flux(), &[1.0, 2.0, 1.5]);
    assert!(data.uncertainty().is_none());
}

#[test]
fn reads_uncertainty_column() {
    let file = write_csv("time,flux,flux_err\n0.0,1.0,0.1\n1.0,2.0,0.2\n");
    let data = read_csv(file.path(), &ReaderConfig::new()).unwrap();
    assert_eq!(data.uncertainty(), Some([0.1, 0.2].as_slice()));
}

#[test]
fn sorts_rows_by_time() {
    let file = write_csv("time,flux\n2.0,3.0\n0.0,1.0\n1.0,2.0\n");
    let data = read_csv(file.path(), &ReaderConfig::new()).unwrap();
    assert_eq!(data.time(), &[0.0, 1.0, 2.0]);
    assert_eq!(data.flux(), &[1.0, 2.0, 3.0]);
}

#[test]
fn filters_by_pulse_number() {
    let file = write_csv(
        "time,flux,pulse_number\n0.0,1.0,0\n1.0,2.0,1\n2.0,3.0,1\n3.0,4.0,0\n",
    );
    let config = ReaderConfig::new().with_pulse_number(1);
    let data = read_csv(file.path(), &config).unwrap();
    assert_eq!(data.time(), &[1.0, 2.0]);
    assert_eq!(data.flux(), &[2.0, 3.0]);
}

#[test]
fn missing_flux_column() {
    let file = write_csv("time,amplitude\n0.0,1.0\n");
    let err = read_csv(file.path(), &ReaderConfig::new()).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn { column: "flux", .. }));
}

#[test]
fn filter_without_pulse_column() {
    let file = write_csv("time,flux\n0.0,1.0\n1.0,2.0\n");
    let config = ReaderConfig::new().with_pulse_number(0);
    let err = read_csv(file.path(), &config).unwrap_err();
    assert!(matches!(
        err,
        DataError::MissingColumn {
            column: "pulse_number",
            ..
        }
    ));
}

#[test]
fn empty_selection() {
    let file = write_csv("time,flux,pulse_number\n0.0,1.0,0\n1.0,2.0,0\n");
    let config = ReaderConfig::new().with_pulse_number(7);
    let err = read_csv(file.path(), &config).unwrap_err();
    assert!(matches!(
        err,
        DataError::EmptySelection {
            pulse_number: 7,
            ..
        }
    ));
}

#[test]
fn malformed_value_reported_as_non_finite() {
    let file = write_csv("time,flux\n0.0,1.0\n1.0,oops\n");
    let err = read_csv(file.path(), &ReaderConfig::new()).unwrap_err();
    assert!(matches!(err, DataError::NonFinite { name: "flux", .. }));
}

#[test]
fn missing_file() {
    let err = read_csv(
        std::path::Path::new("/nonexistent/pulses.csv"),
        &ReaderConfig::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DataError::Csv { .. }));
}
