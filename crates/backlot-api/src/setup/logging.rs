//! Tracing subscriber initialization

use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str =
    "backlot_api=debug,backlot_db=debug,backlot_core=debug,backlot_processing=debug,tower_http=debug";

/// Initialize the global tracing subscriber with a compact console format.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .init();
}
