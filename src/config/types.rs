//! Configuration records.
//!
//! Everything here is plain data: the derived [`Config`] record, the
//! per-concern sub-records it carries, and the [`ConfigOverrides`] patch used
//! to adjust a derived config at construction time. Derivation logic lives in
//! the parent module.

use std::path::PathBuf;

use serde::Serialize;

use crate::env::EnvType;
use crate::error::ConfigError;

/// Route families the server exposes, used to select a base URL.
///
/// Wire formats carry the tag as a small integer; `TryFrom<u32>` and
/// `FromStr` are the only ways to build one from untrusted input, and both
/// reject unknown tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteType {
    /// Browser-facing pages.
    Web,
    /// JSON API consumed by sync clients.
    Api,
    /// User-uploaded content, served from its own origin when configured.
    UserContent,
}

impl TryFrom<u32> for RouteType {
    type Error = ConfigError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(RouteType::Web),
            2 => Ok(RouteType::Api),
            3 => Ok(RouteType::UserContent),
            other => Err(ConfigError::UnknownRouteType(other.to_string())),
        }
    }
}

impl std::str::FromStr for RouteType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web" => Ok(RouteType::Web),
            "api" => Ok(RouteType::Api),
            "userContent" => Ok(RouteType::UserContent),
            other => Err(ConfigError::UnknownRouteType(other.to_string())),
        }
    }
}

/// Which database engine the server connects to, with engine-specific
/// connection fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "client", rename_all = "lowercase")]
pub enum DatabaseClient {
    /// File-backed SQLite database. The default when `DB_CLIENT` is unset.
    Sqlite {
        /// Path to the database file, taken literally from `SQLITE_DATABASE`.
        database: String,
        /// Capture async stack traces on driver errors. Costs performance,
        /// which is acceptable for the single-file default setup.
        async_stack_traces: bool,
    },
    /// PostgreSQL over the network. Selected by `DB_CLIENT=pg`.
    Pg {
        database: String,
        user: String,
        password: String,
        host: String,
        port: u16,
    },
}

/// Database settings shared by both engines plus the selected client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    pub client: DatabaseClient,
    /// Log queries slower than `slow_query_log_min_duration_ms`.
    pub slow_query_log_enabled: bool,
    pub slow_query_log_min_duration_ms: u32,
    /// Run pending migrations automatically at startup.
    pub auto_migration: bool,
}

/// SMTP transport settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailerConfig {
    /// On by default; only the exact value `MAILER_ENABLED=0` disables it.
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Always true. See the note in the parent module before honouring
    /// `MAILER_SECURE` here.
    pub secure: bool,
    pub auth_user: String,
    pub auth_password: String,
    pub noreply_name: String,
    pub noreply_email: String,
}

/// Stripe billing settings: env-provided secrets merged with the static
/// per-environment public fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripeConfig {
    /// True iff a secret key is configured.
    pub enabled: bool,
    pub publishable_key: String,
    pub secret_key: String,
    pub webhook_secret: String,
}

/// The derived, immutable server configuration.
///
/// Built once during startup from an [`EnvVariables`](crate::env::EnvVariables)
/// snapshot and never mutated afterwards; every consumer reads a disjoint
/// subset of these fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub app_name: String,
    /// Crate version baked in at compile time.
    pub app_version: String,
    pub env: EnvType,
    pub root_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub log_dir: PathBuf,
    pub port: u16,
    /// Captured from `RUNNING_IN_DOCKER` at construction time; drives the
    /// localhost-to-gateway remap for outbound connections.
    pub running_in_docker: bool,
    pub database: DatabaseConfig,
    pub mailer: MailerConfig,
    pub stripe: StripeConfig,
    /// Public origin for browser-facing pages, no trailing slash.
    pub base_url: String,
    /// Origin for the sync API; falls back to `base_url`.
    pub api_base_url: String,
    /// Origin for user-uploaded content; falls back to `base_url`.
    pub user_content_base_url: String,
    /// True when the API origin is on a recognized cloud domain; gates
    /// cloud-only features downstream.
    pub is_cloud_hosted: bool,
    pub support_email: String,
    pub support_name: String,
    pub business_email: String,
    pub signup_enabled: bool,
    pub terms_enabled: bool,
    pub account_types_enabled: bool,
    pub cookies_secure: bool,
}

/// Patch of optional per-field replacements applied after derivation.
///
/// Shallow merge: each `Some` replaces the corresponding derived field
/// wholesale, `None` keeps it. Sub-records (`database`, `mailer`, `stripe`)
/// are replaced as a unit, matching top-level-key override semantics.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub app_name: Option<String>,
    pub root_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub port: Option<u16>,
    pub running_in_docker: Option<bool>,
    pub database: Option<DatabaseConfig>,
    pub mailer: Option<MailerConfig>,
    pub stripe: Option<StripeConfig>,
    pub base_url: Option<String>,
    pub api_base_url: Option<String>,
    pub user_content_base_url: Option<String>,
    pub is_cloud_hosted: Option<bool>,
    pub support_email: Option<String>,
    pub support_name: Option<String>,
    pub business_email: Option<String>,
    pub signup_enabled: Option<bool>,
    pub terms_enabled: Option<bool>,
    pub account_types_enabled: Option<bool>,
    pub cookies_secure: Option<bool>,
}

impl ConfigOverrides {
    /// Merge this patch over a derived config. Override wins per field.
    pub(crate) fn apply(self, base: &mut Config) {
        if let Some(v) = self.app_name {
            base.app_name = v;
        }
        if let Some(v) = self.root_dir {
            base.root_dir = v;
        }
        if let Some(v) = self.temp_dir {
            base.temp_dir = v;
        }
        if let Some(v) = self.log_dir {
            base.log_dir = v;
        }
        if let Some(v) = self.port {
            base.port = v;
        }
        if let Some(v) = self.running_in_docker {
            base.running_in_docker = v;
        }
        if let Some(v) = self.database {
            base.database = v;
        }
        if let Some(v) = self.mailer {
            base.mailer = v;
        }
        if let Some(v) = self.stripe {
            base.stripe = v;
        }
        if let Some(v) = self.base_url {
            base.base_url = v;
        }
        if let Some(v) = self.api_base_url {
            base.api_base_url = v;
        }
        if let Some(v) = self.user_content_base_url {
            base.user_content_base_url = v;
        }
        if let Some(v) = self.is_cloud_hosted {
            base.is_cloud_hosted = v;
        }
        if let Some(v) = self.support_email {
            base.support_email = v;
        }
        if let Some(v) = self.support_name {
            base.support_name = v;
        }
        if let Some(v) = self.business_email {
            base.business_email = v;
        }
        if let Some(v) = self.signup_enabled {
            base.signup_enabled = v;
        }
        if let Some(v) = self.terms_enabled {
            base.terms_enabled = v;
        }
        if let Some(v) = self.account_types_enabled {
            base.account_types_enabled = v;
        }
        if let Some(v) = self.cookies_secure {
            base.cookies_secure = v;
        }
    }
}
