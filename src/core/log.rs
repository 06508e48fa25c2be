use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Maps the `-v` count to per-target levels: silent by default, `-v` shows
/// this crate's debug events and `-vv` adds tracing plus reqwest's own logs.
fn targets_for(verbosity: u8) -> Targets {
    match verbosity {
        0 => Targets::new().with_target(APP_TARGET, LevelFilter::OFF),
        1 => Targets::new().with_target(APP_TARGET, LevelFilter::DEBUG),
        _ => Targets::new()
            .with_target(APP_TARGET, LevelFilter::TRACE)
            .with_target("reqwest", LevelFilter::DEBUG),
    }
}

/// Installs the global subscriber. `RUST_LOG`, when set, narrows what the
/// verbosity allows. Events go to stderr so they never land between the
/// calculator's prompts on stdout.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let app_filter = targets_for(verbosity);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .try_init()
        .context("Failed to install the log subscriber")
}
