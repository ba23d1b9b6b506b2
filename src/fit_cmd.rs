use std::fs;

use anyhow::{Context, Result};
use corella_analysis::AnalysisRunner;
use corella_data::read_csv;
use tracing::info;

use crate::cli::FitArgs;
use crate::config::{self, CorellaConfig};
use crate::convert;

pub fn run(args: FitArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => CorellaConfig::default(),
    };

    let reader = convert::reader_config(&config, &args);
    let mut data = read_csv(&args.data, &reader)
        .with_context(|| format!("loading data from {}", args.data.display()))?;
    if let Some(width) = convert::truncate_width(&config, &args) {
        data = data
            .truncated(width)
            .with_context(|| format!("truncating data to span fraction {width}"))?;
    }
    info!(
        n_samples = data.len(),
        start = data.start(),
        end = data.end(),
        "loaded time series"
    );

    let analysis = convert::analysis_config(&config, &args);
    let engine = convert::engine(&analysis);
    let runner = AnalysisRunner::new(analysis)?;
    let result = runner.run(&data, &engine)?;

    match result.log_bayes_factor {
        Some(log_b) => info!(log_bayes_factor = log_b, "analysis complete"),
        None => info!("analysis complete, a run failed; no Bayes factor"),
    }

    let outdir = args
        .outdir
        .unwrap_or_else(|| config.output.outdir.clone());
    fs::create_dir_all(&outdir)
        .with_context(|| format!("creating output directory {}", outdir.display()))?;
    let path = outdir.join(format!("{}_result.json", result.label));
    let json = serde_json::to_string_pretty(&result).context("serializing result")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote result");
    Ok(())
}
