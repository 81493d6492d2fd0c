// ── Core error types ──
//
// Hard failures only. Everything the operator can fix by editing a
// field accumulates as strings inside `ValidationResult` and never
// crosses this boundary. Each variant names the screen it came from so
// the UI can send the operator back to the right place.

use thiserror::Error;

use bootforge_settings::SettingsError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{screen}: failed to load settings: {source}")]
    SettingsLoad {
        screen: String,
        #[source]
        source: SettingsError,
    },

    #[error("{screen}: failed to write settings: {source}")]
    SettingsWrite {
        screen: String,
        #[source]
        source: SettingsError,
    },

    #[error("no network interfaces detected")]
    NoInterfaces,
}
