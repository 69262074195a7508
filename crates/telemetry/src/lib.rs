//! Logging and tracing bootstrap.

use tracing_subscriber::EnvFilter;

use biblio_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing pipeline from settings.
///
/// `RUST_LOG` wins over the configured filter so operators can crank
/// verbosity without editing config files. Safe to call more than once; later
/// calls are no-ops (tests set their own subscribers).
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if result.is_ok() {
        tracing::info!(
            target: "biblio-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }
}
