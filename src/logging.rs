//! Logging setup for the `flagtree` binary.
//!
//! Filter comes from `RUST_LOG` (default `flagtree=info`). Output goes to
//! stderr so stdout stays reserved for the rendered configuration. Set
//! `FLAGTREE_LOG_FORMAT=json` for one JSON object per event.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "FLAGTREE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "flagtree=info";

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
        tracing::info!(event = "config.test_event");
    }
}
