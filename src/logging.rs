use tracing_subscriber::EnvFilter;

/// Log targets covered by the verbosity flag, one per workspace crate.
const CRATE_TARGETS: &[&str] = &[
    "corella",
    "corella_analysis",
    "corella_data",
    "corella_inference",
    "corella_model",
    "corella_prior",
];

/// Installs the tracing subscriber.
///
/// Repeated `-v` flags raise the level for the workspace targets only:
/// warn by default, then info, debug, trace. A set `RUST_LOG` takes
/// precedence over the flag entirely.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let directives: String = CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
