use std::collections::BTreeMap;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Headers attached to every response, preflight or not.
pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), ALLOW_ORIGIN.to_string()),
        ("Access-Control-Allow-Methods".to_string(), ALLOW_METHODS.to_string()),
        ("Access-Control-Allow-Headers".to_string(), ALLOW_HEADERS.to_string()),
    ])
}

/// Initialize structured logging with JSON format.
/// Called once per cold start; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // The Lambda log sink stamps each line, so the subscriber skips its own timestamp.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_target(true)
                .without_time(),
        )
        .try_init()?;

    tracing::info!("Structured logging initialized with JSON format");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_headers_are_the_fixed_four() {
        let headers = cors_headers();

        assert_eq!(headers.len(), 4);
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET, OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
    }
}
