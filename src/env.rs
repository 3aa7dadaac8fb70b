//! Environment-variable parsing.
//!
//! This module turns the raw process environment (a map of string keys to
//! string values) into a typed [`EnvVariables`] snapshot. Every field has a
//! documented default, so an empty map is a valid input; the only way parsing
//! can fail is a numeric variable holding non-numeric text.
//!
//! # Parse rules
//!
//! - **String**: absent → the field default (empty string unless specified).
//! - **Boolean**: absent or empty → the field default; present → true iff the
//!   value is exactly `"1"`.
//! - **Integer**: absent or empty → the field default; non-numeric →
//!   [`ConfigError::InvalidNumber`] naming the variable; otherwise the parsed
//!   value.
//! - **Opt-out flag** (`MAILER_ENABLED` only): true unless the value is
//!   exactly `"0"`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment tag.
///
/// Selects which static public billing data is loaded and gates a few
/// dev-only behaviors downstream. `BuildTypes` is a tooling alias that
/// behaves exactly like `Dev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvType {
    Dev,
    Test,
    Prod,
    /// Build-tooling alias; treated as `Dev` everywhere.
    BuildTypes,
}

impl EnvType {
    /// True for `Dev` and its `BuildTypes` alias.
    pub fn is_dev(self) -> bool {
        matches!(self, EnvType::Dev | EnvType::BuildTypes)
    }

    /// Parse from a string, falling back to `Dev` for anything unrecognized.
    ///
    /// Missing settings are defaulted rather than rejected, and the
    /// environment tag follows the same permissive policy.
    pub fn from_str_or_dev(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => EnvType::Prod,
            "test" | "testing" => EnvType::Test,
            "buildtypes" => EnvType::BuildTypes,
            _ => EnvType::Dev,
        }
    }
}

impl fmt::Display for EnvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvType::Dev => write!(f, "dev"),
            EnvType::Test => write!(f, "test"),
            EnvType::Prod => write!(f, "prod"),
            EnvType::BuildTypes => write!(f, "buildTypes"),
        }
    }
}

/// Typed snapshot of every environment variable the server reads.
///
/// Field names map to variable names by upper-casing: `app_port` reads
/// `APP_PORT`. This is the intermediate form between the raw process
/// environment and the derived [`Config`](crate::config::Config): values are
/// typed and defaulted here, while cross-field logic (URL fallback chains,
/// Docker host remapping, database client selection) happens during `Config`
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvVariables {
    // General
    pub app_name: String,
    pub app_port: u16,
    pub running_in_docker: bool,
    pub signup_enabled: bool,
    pub terms_enabled: bool,
    pub account_types_enabled: bool,
    pub cookies_secure: bool,
    pub support_email: String,
    pub support_name: String,
    pub business_email: String,

    // URLs
    pub app_base_url: String,
    pub api_base_url: String,
    pub user_content_base_url: String,

    // Database
    pub db_client: String,
    pub db_slow_query_log_enabled: bool,
    pub db_slow_query_log_min_duration: u32,
    pub db_auto_migration: bool,
    pub postgres_database: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub sqlite_database: String,

    // Mailer
    pub mailer_enabled: bool,
    pub mailer_host: String,
    pub mailer_port: u16,
    pub mailer_secure: bool,
    pub mailer_auth_user: String,
    pub mailer_auth_password: String,
    pub mailer_noreply_name: String,
    pub mailer_noreply_email: String,

    // Stripe
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
}

impl EnvVariables {
    /// Parse a raw environment map into a typed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if any numeric variable holds
    /// non-numeric text. Every other malformed or missing value falls back to
    /// its documented default.
    pub fn parse(raw: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(EnvVariables {
            app_name: string_value(raw, "APP_NAME", "Joplin Server"),
            app_port: int_value(raw, "APP_PORT", 22300)?,
            running_in_docker: bool_value(raw, "RUNNING_IN_DOCKER", false),
            signup_enabled: bool_value(raw, "SIGNUP_ENABLED", false),
            terms_enabled: bool_value(raw, "TERMS_ENABLED", false),
            account_types_enabled: bool_value(raw, "ACCOUNT_TYPES_ENABLED", false),
            cookies_secure: bool_value(raw, "COOKIES_SECURE", false),
            // Intentionally invalid placeholder: forces the operator to set a
            // real address before outgoing support mail can work.
            support_email: string_value(raw, "SUPPORT_EMAIL", "SUPPORT_EMAIL"),
            support_name: string_value(raw, "SUPPORT_NAME", ""),
            business_email: string_value(raw, "BUSINESS_EMAIL", ""),

            app_base_url: string_value(raw, "APP_BASE_URL", ""),
            api_base_url: string_value(raw, "API_BASE_URL", ""),
            user_content_base_url: string_value(raw, "USER_CONTENT_BASE_URL", ""),

            db_client: string_value(raw, "DB_CLIENT", "sqlite"),
            db_slow_query_log_enabled: bool_value(raw, "DB_SLOW_QUERY_LOG_ENABLED", false),
            db_slow_query_log_min_duration: int_value(raw, "DB_SLOW_QUERY_LOG_MIN_DURATION", 1000)?,
            db_auto_migration: bool_value(raw, "DB_AUTO_MIGRATION", true),
            postgres_database: string_value(raw, "POSTGRES_DATABASE", "joplin"),
            postgres_user: string_value(raw, "POSTGRES_USER", "joplin"),
            postgres_password: string_value(raw, "POSTGRES_PASSWORD", "joplin"),
            postgres_host: string_value(raw, "POSTGRES_HOST", ""),
            postgres_port: int_value(raw, "POSTGRES_PORT", 5432)?,
            sqlite_database: string_value(raw, "SQLITE_DATABASE", ""),

            mailer_enabled: enabled_unless_zero(raw, "MAILER_ENABLED"),
            mailer_host: string_value(raw, "MAILER_HOST", ""),
            mailer_port: int_value(raw, "MAILER_PORT", 587)?,
            mailer_secure: bool_value(raw, "MAILER_SECURE", true),
            mailer_auth_user: string_value(raw, "MAILER_AUTH_USER", ""),
            mailer_auth_password: string_value(raw, "MAILER_AUTH_PASSWORD", ""),
            mailer_noreply_name: string_value(raw, "MAILER_NOREPLY_NAME", ""),
            mailer_noreply_email: string_value(raw, "MAILER_NOREPLY_EMAIL", ""),

            stripe_secret_key: string_value(raw, "STRIPE_SECRET_KEY", ""),
            stripe_webhook_secret: string_value(raw, "STRIPE_WEBHOOK_SECRET", ""),
        })
    }
}

/// Read a string variable, defaulting when absent.
fn string_value(raw: &HashMap<String, String>, name: &'static str, default: &str) -> String {
    match raw.get(name) {
        Some(value) => value.clone(),
        None => default.to_string(),
    }
}

/// Read a boolean variable.
///
/// Absent or empty keeps the default; otherwise only the exact value `"1"`
/// means true. `"true"`, `"yes"` and friends all read as false, so a flag
/// that was explicitly set to garbage never silently enables a feature.
fn bool_value(raw: &HashMap<String, String>, name: &'static str, default: bool) -> bool {
    match raw.get(name).map(String::as_str) {
        None | Some("") => default,
        Some(value) => value == "1",
    }
}

/// Read an opt-out flag: true unless the value is exactly `"0"`.
///
/// The inverse polarity of [`bool_value`]: the feature is on by default and
/// only an explicit `"0"` turns it off. Used for `MAILER_ENABLED`, where
/// `"true"`, `"yes"` or other junk must not silently disable mail.
fn enabled_unless_zero(raw: &HashMap<String, String>, name: &'static str) -> bool {
    raw.get(name).map(String::as_str) != Some("0")
}

/// Read an integer variable.
///
/// Absent or empty keeps the default. Non-numeric text is the one
/// misconfiguration this layer refuses to paper over: the error names the
/// variable and the offending value.
fn int_value<T>(raw: &HashMap<String, String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    match raw.get(name).map(String::as_str) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn bool_is_true_only_for_literal_one() {
        let m = raw(&[("A", "1"), ("B", "true"), ("C", "0"), ("D", "yes")]);
        assert!(bool_value(&m, "A", false));
        assert!(!bool_value(&m, "B", false));
        assert!(!bool_value(&m, "C", true));
        assert!(!bool_value(&m, "D", false));
    }

    #[test]
    fn bool_absent_or_empty_keeps_default() {
        let m = raw(&[("EMPTY", "")]);
        assert!(bool_value(&m, "MISSING", true));
        assert!(!bool_value(&m, "MISSING", false));
        assert!(bool_value(&m, "EMPTY", true));
    }

    #[test]
    fn opt_out_flag_is_false_only_for_literal_zero() {
        let m = raw(&[("A", "0"), ("B", "1"), ("C", "true"), ("D", "")]);
        assert!(!enabled_unless_zero(&m, "A"));
        assert!(enabled_unless_zero(&m, "B"));
        assert!(enabled_unless_zero(&m, "C"));
        assert!(enabled_unless_zero(&m, "D"));
        assert!(enabled_unless_zero(&m, "MISSING"));
    }

    #[test]
    fn int_parses_exact_value() {
        let m = raw(&[("PORT", "8080")]);
        assert_eq!(int_value(&m, "PORT", 22300u16).unwrap(), 8080);
    }

    #[test]
    fn int_absent_or_empty_keeps_default() {
        let m = raw(&[("EMPTY", "")]);
        assert_eq!(int_value(&m, "MISSING", 587u16).unwrap(), 587);
        assert_eq!(int_value(&m, "EMPTY", 587u16).unwrap(), 587);
    }

    #[test]
    fn int_rejects_non_numeric_text_naming_the_value() {
        let m = raw(&[("APP_PORT", "not-a-port")]);
        let err = int_value(&m, "APP_PORT", 22300u16).unwrap_err();
        match err {
            ConfigError::InvalidNumber { name, value } => {
                assert_eq!(name, "APP_PORT");
                assert_eq!(value, "not-a-port");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_environment_yields_documented_defaults() {
        let vars = EnvVariables::parse(&HashMap::new()).unwrap();
        assert_eq!(vars.app_name, "Joplin Server");
        assert_eq!(vars.app_port, 22300);
        assert_eq!(vars.db_client, "sqlite");
        assert_eq!(vars.postgres_database, "joplin");
        assert_eq!(vars.postgres_user, "joplin");
        assert_eq!(vars.postgres_password, "joplin");
        assert_eq!(vars.postgres_port, 5432);
        assert_eq!(vars.mailer_port, 587);
        assert!(vars.mailer_enabled);
        assert!(vars.db_auto_migration);
        assert_eq!(vars.support_email, "SUPPORT_EMAIL");
        assert!(!vars.running_in_docker);
    }

    #[test]
    fn invalid_number_error_message_names_the_variable() {
        let m = raw(&[("DB_SLOW_QUERY_LOG_MIN_DURATION", "fast")]);
        let err = EnvVariables::parse(&m).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number in DB_SLOW_QUERY_LOG_MIN_DURATION: \"fast\""
        );
    }

    #[test]
    fn env_type_parses_with_dev_fallback() {
        assert_eq!(EnvType::from_str_or_dev("prod"), EnvType::Prod);
        assert_eq!(EnvType::from_str_or_dev("production"), EnvType::Prod);
        assert_eq!(EnvType::from_str_or_dev("test"), EnvType::Test);
        assert_eq!(EnvType::from_str_or_dev("buildTypes"), EnvType::BuildTypes);
        assert_eq!(EnvType::from_str_or_dev("staging"), EnvType::Dev);
    }

    #[test]
    fn build_types_counts_as_dev() {
        assert!(EnvType::Dev.is_dev());
        assert!(EnvType::BuildTypes.is_dev());
        assert!(!EnvType::Prod.is_dev());
        assert!(!EnvType::Test.is_dev());
    }
}
