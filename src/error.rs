//! Error types for configuration loading.
//!
//! Missing or malformed optional settings are silently defaulted rather than
//! rejected, so this enum only covers the three failures that are fatal at
//! call time: reading before initialization, non-numeric text in a numeric
//! variable, and an unrecognized route-type tag.

/// All errors the configuration layer can produce.
///
/// Each variant signals a distinct caller mistake:
///
/// - `Uninitialized` is a startup-ordering bug: something read the store
///   before the startup routine populated it.
/// - `InvalidNumber` is operator misconfiguration: the named environment
///   variable must be fixed before the process can boot.
/// - `UnknownRouteType` is a programming error in the caller: a numeric or
///   textual route tag that does not map to any known route type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration store was read before `init` ran.
    #[error("config is not initialized - call ConfigStore::init() during startup")]
    Uninitialized,

    /// A numeric environment variable holds non-numeric text.
    ///
    /// Carries the variable name and the offending value so the operator can
    /// find the bad setting without reading code.
    #[error("invalid number in {name}: \"{value}\"")]
    InvalidNumber {
        /// Environment variable name, e.g. `APP_PORT`.
        name: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A route-type tag did not match any known route type.
    #[error("unknown route type: {0}")]
    UnknownRouteType(String),
}
