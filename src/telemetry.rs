//! Opt-in log output for hosts that have no subscriber of their own.
//!
//! The crate only emits `tracing` events. Without the `telemetry` feature the
//! functions here do nothing and report `false`.

use crate::error::ChartResult;

/// Filter used by [`init_default_tracing`]: this crate at `info`, others off.
pub const DEFAULT_DIRECTIVE: &str = "ridership_chart=info";

/// Installs a compact fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` decides what is
/// logged. Returns `Ok(false)` when the feature is off or a global subscriber
/// is already installed.
pub fn init_tracing(default_directive: &str) -> ChartResult<bool> {
    #[cfg(feature = "telemetry")]
    {
        use crate::error::ChartError;
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
                ChartError::InvalidSpec(format!(
                    "invalid tracing directive `{default_directive}`: {e}"
                ))
            })?,
        };
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(default_directive, "tracing subscriber installed");
        }
        Ok(installed)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = default_directive;
        Ok(false)
    }
}

/// [`init_tracing`] with [`DEFAULT_DIRECTIVE`].
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_DIRECTIVE).unwrap_or(false)
}
