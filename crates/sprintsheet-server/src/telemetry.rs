//! Subscriber setup for the `sprintsheet` binary

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// The filter comes from `SPRINTSHEET_LOG`, then `RUST_LOG`, then `info`.
pub(crate) fn init(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("SPRINTSHEET_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}
