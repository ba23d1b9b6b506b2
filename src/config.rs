use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level corella configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CorellaConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Data selection settings.
    #[serde(default)]
    pub data: DataToml,

    /// Flux model settings.
    #[serde(default)]
    pub model: ModelToml,

    /// Prior policy settings.
    #[serde(default)]
    pub prior: PriorToml,

    /// Sampler settings.
    #[serde(default)]
    pub sampler: SamplerToml,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    /// Keep only rows with this pulse number.
    pub pulse_number: Option<i64>,
    /// Keep only samples within this fraction of the span around the
    /// midpoint.
    pub truncate_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    /// Shapelet coefficient counts, one per pulse component.
    #[serde(default = "default_shapelets")]
    pub shapelets: Vec<usize>,
    /// Baseline polynomial degree.
    #[serde(default)]
    pub polynomial_degree: usize,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            shapelets: default_shapelets(),
            polynomial_degree: 0,
        }
    }
}

fn default_shapelets() -> Vec<usize> {
    vec![3]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorToml {
    /// Spike mass of the slab-spike coefficient priors.
    #[serde(default = "default_mix")]
    pub mix: f64,
    /// Coefficient slab half-width as a multiple of the flux range.
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,
    /// Pulse-width prior bounds; data-derived when absent.
    #[serde(default)]
    pub beta_min: Option<f64>,
    #[serde(default)]
    pub beta_max: Option<f64>,
    /// Log-uniform pulse-width prior instead of uniform.
    #[serde(default)]
    pub log_uniform_beta: bool,
    /// Arrival-time window centre as a span fraction; peak-derived when
    /// only a width is given.
    #[serde(default)]
    pub toa_centre: Option<f64>,
    /// Arrival-time window width as a span fraction; full span when absent.
    #[serde(default)]
    pub toa_width: Option<f64>,
}

impl Default for PriorToml {
    fn default() -> Self {
        Self {
            mix: default_mix(),
            max_multiplier: default_max_multiplier(),
            beta_min: None,
            beta_max: None,
            log_uniform_beta: false,
            toa_centre: None,
            toa_width: None,
        }
    }
}

fn default_mix() -> f64 {
    0.5
}
fn default_max_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerToml {
    #[serde(default = "default_n_live")]
    pub n_live: usize,
    #[serde(default = "default_walk_steps")]
    pub walk_steps: usize,
    #[serde(default = "default_dlogz")]
    pub dlogz: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SamplerToml {
    fn default() -> Self {
        Self {
            n_live: default_n_live(),
            walk_steps: default_walk_steps(),
            dlogz: default_dlogz(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_n_live() -> usize {
    500
}
fn default_walk_steps() -> usize {
    25
}
fn default_dlogz() -> f64 {
    0.1
}
fn default_max_iterations() -> usize {
    100_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            outdir: default_outdir(),
            label: default_label(),
        }
    }
}

fn default_outdir() -> PathBuf {
    PathBuf::from("outdir")
}
fn default_label() -> String {
    "corella".to_string()
}

/// Loads and parses a TOML configuration file.
pub fn load(path: &Path) -> Result<CorellaConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_gets_defaults() {
        let config: CorellaConfig = toml::from_str("").unwrap();
        assert_eq!(config.model.shapelets, vec![3]);
        assert_eq!(config.sampler.n_live, 500);
        assert_eq!(config.prior.mix, 0.5);
        assert_eq!(config.output.label, "corella");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CorellaConfig, _> = toml::from_str("[sampler]\nnlive = 100\n");
        assert!(result.is_err());
    }

    #[test]
    fn partial_override() {
        let text = "[model]\nshapelets = [2, 4]\n[prior]\nmix = 0.2\n";
        let config: CorellaConfig = toml::from_str(text).unwrap();
        assert_eq!(config.model.shapelets, vec![2, 4]);
        assert_eq!(config.prior.mix, 0.2);
        assert_eq!(config.prior.max_multiplier, 1.0);
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 7\n[output]\nlabel = \"run1\"").unwrap();
        let config = load(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output.label, "run1");
    }
}
