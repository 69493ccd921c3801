use eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// Without `-v` the filter comes from `RUST_LOG` and defaults to `warn`;
/// `-v` forces `info` and `-vv` forces `debug`.
pub(crate) fn init(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| eyre!("failed to initialize logging: {err}"))
}
