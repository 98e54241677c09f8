//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed (tests, embedding
/// hosts); the existing one is left in place.
pub fn init(config: &Config) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Plain => registry.with(fmt::layer()).try_init(),
    };

    result.is_ok()
}
