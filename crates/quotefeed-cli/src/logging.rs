//! Diagnostics go to stderr; stdout carries nothing but the JSON result.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FALLBACK_LEVEL: &str = "warn";

/// Install the global subscriber filtered by `level`.
///
/// An unparseable filter falls back to `warn`. Calling this twice is a
/// no-op after the first subscriber is installed.
pub fn init(level: &str) {
    let filter = build_filter(level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_directives_and_falls_back_on_garbage() {
        assert_eq!(build_filter("quotefeed_core=debug").to_string(), "quotefeed_core=debug");
        assert_eq!(build_filter("info").to_string(), "info");
        assert_eq!(build_filter("quotefeed_core=loud").to_string(), "warn");
    }
}
