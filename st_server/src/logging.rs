//! Structured logging configuration.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! also captures those records, so one `RUST_LOG` filter covers both.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use st_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init().unwrap();
///     tracing::info!("Server starting");
/// }
/// ```
///
/// # Errors
///
/// Fails if a global subscriber has already been installed
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Structured logging initialized");
    Ok(())
}

/// Log a rejected API call with its request ID
pub fn log_api_error(request_id: &str, status: u16, message: &str) {
    if status >= 500 {
        tracing::error!(request_id, http_status = status, "API error: {}", message);
    } else {
        tracing::debug!(request_id, http_status = status, "API rejection: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_log_api_error() {
        // Just ensure it doesn't panic without a subscriber
        log_api_error("req-1", 404, "Tournament not found: t1");
        log_api_error("req-2", 500, "Internal server error");
    }
}
