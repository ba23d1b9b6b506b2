use anyhow::{Context, Result};
use corella_model::hermite_series;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::info;

use crate::cli::SimulateArgs;

pub fn run(args: SimulateArgs) -> Result<()> {
    anyhow::ensure!(args.n_samples >= 2, "need at least two samples");
    anyhow::ensure!(args.beta > 0.0, "pulse width must be positive");
    anyhow::ensure!(args.sigma >= 0.0, "noise amplitude must not be negative");

    let toa = args.toa.unwrap_or(0.5 * args.duration);
    let with_noise = args.sigma > 0.0;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    // The uncertainty column only exists when there is noise to report;
    // the loader treats its absence as "fit the noise amplitude".
    if with_noise {
        writer.write_record(["time", "flux", "flux_err"])
    } else {
        writer.write_record(["time", "flux"])
    }
    .context("writing header")?;

    let noise = Normal::new(0.0, args.sigma.max(f64::MIN_POSITIVE))
        .context("building noise distribution")?;
    for i in 0..args.n_samples {
        let t = args.duration * i as f64 / (args.n_samples - 1) as f64;
        let x = (t - toa) / args.beta;
        let pulse = (-x * x).exp() * hermite_series(&args.coefficients, x);
        let mut flux = pulse + args.baseline;
        if with_noise {
            flux += noise.sample(&mut rng);
        }
        let row = if with_noise {
            vec![t.to_string(), flux.to_string(), args.sigma.to_string()]
        } else {
            vec![t.to_string(), flux.to_string()]
        };
        writer.write_record(&row).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    info!(
        path = %args.output.display(),
        n_samples = args.n_samples,
        beta = args.beta,
        toa,
        "wrote synthetic pulse data"
    );
    Ok(())
}
