//! Configuration derivation and the startup-owned store.
//!
//! [`EnvVariables`](crate::env::EnvVariables) gives typed, defaulted values;
//! this module layers the cross-field logic on top:
//!
//! - base-URL fallback chain (`APP_BASE_URL` → `http://localhost:<port>`,
//!   API and user-content URLs falling back to the base URL)
//! - database client selection and the Docker localhost remap
//! - mailer and Stripe assembly
//! - cloud-domain detection on the API origin
//!
//! The result is one immutable [`Config`], held by a [`ConfigStore`] that the
//! startup routine owns and passes by reference to consumers. There is no
//! process-wide global: tests (and anything else) can hold several stores
//! with different configurations in one process.

mod stripe;
mod types;

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{info, warn};

pub use types::{
    Config, ConfigOverrides, DatabaseClient, DatabaseConfig, MailerConfig, RouteType, StripeConfig,
};

use crate::env::{EnvType, EnvVariables};
use crate::error::ConfigError;

/// Alias routed to the host machine by the container runtime. Inside a
/// container, `localhost` is the container's own loopback and never reaches
/// services running on the host.
pub const DOCKER_HOST_GATEWAY: &str = "host.docker.internal";

/// Domain suffixes that identify the hosted cloud variant of the server.
const CLOUD_DOMAINS: [&str; 2] = ["joplincloud.com", "joplincloud.local"];

impl Config {
    /// Derive a configuration from a typed environment snapshot, then merge
    /// the optional override patch (override wins per field).
    pub fn new(env: EnvType, vars: &EnvVariables, overrides: Option<ConfigOverrides>) -> Config {
        let base_url = base_url_from_env(vars);
        let api_base_url = first_non_empty(&vars.api_base_url, &base_url);
        let user_content_base_url = first_non_empty(&vars.user_content_base_url, &base_url);

        let support_email = vars.support_email.clone();
        let support_name = first_non_empty(&vars.support_name, &vars.app_name);
        let business_email = first_non_empty(&vars.business_email, &support_email);

        let root_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let mut config = Config {
            app_name: vars.app_name.clone(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            env,
            temp_dir: root_dir.join("temp"),
            log_dir: root_dir.join("logs"),
            root_dir,
            port: vars.app_port,
            running_in_docker: vars.running_in_docker,
            database: database_config_from_env(vars),
            mailer: mailer_config_from_env(vars),
            stripe: stripe_config_from_env(env, vars),
            is_cloud_hosted: is_cloud_hosted(&api_base_url),
            base_url,
            api_base_url,
            user_content_base_url,
            support_email,
            support_name,
            business_email,
            signup_enabled: vars.signup_enabled,
            terms_enabled: vars.terms_enabled,
            account_types_enabled: vars.account_types_enabled,
            cookies_secure: vars.cookies_secure,
        };

        if let Some(overrides) = overrides {
            overrides.apply(&mut config);
        }

        if config.support_email == "SUPPORT_EMAIL" {
            warn!("SUPPORT_EMAIL is not set - outgoing support mail will use an invalid address");
        }

        config
    }

    /// Base URL for a route family.
    ///
    /// Total over [`RouteType`]; unrecognized tags are rejected earlier, when
    /// the tag is converted from its numeric or textual form.
    pub fn base_url_for(&self, route_type: RouteType) -> &str {
        match route_type {
            RouteType::Web => &self.base_url,
            RouteType::Api => &self.api_base_url,
            RouteType::UserContent => &self.user_content_base_url,
        }
    }

    /// True iff user content is served from the same origin as the web UI.
    ///
    /// Exact string comparison: when the origins match, item URLs can be
    /// shown in pages and cookies stay scoped to a single domain.
    pub fn show_item_urls(&self) -> bool {
        self.user_content_base_url == self.base_url
    }

    /// The containerized flag captured at construction time.
    pub fn running_in_docker(&self) -> bool {
        self.running_in_docker
    }
}

/// Owned holder for the process configuration.
///
/// The startup routine constructs one, calls [`init`](ConfigStore::init)
/// exactly once before any request handling begins, and passes the store (or
/// the `&Config` it yields) to consumers. Calling `init` again silently
/// replaces the stored value; initialization is expected to be
/// single-threaded, so the store does no locking.
#[derive(Debug, Default)]
pub struct ConfigStore {
    config: Option<Config>,
}

impl ConfigStore {
    /// An empty, uninitialized store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw environment, derive the configuration, merge overrides,
    /// and store the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if a numeric environment
    /// variable holds non-numeric text. The store keeps its previous value
    /// (if any) on failure.
    pub fn init(
        &mut self,
        env: EnvType,
        raw: &HashMap<String, String>,
        overrides: Option<ConfigOverrides>,
    ) -> Result<(), ConfigError> {
        let vars = EnvVariables::parse(raw)?;
        let config = Config::new(env, &vars, overrides);
        info!(
            env = %config.env,
            db_client = match config.database.client {
                DatabaseClient::Sqlite { .. } => "sqlite",
                DatabaseClient::Pg { .. } => "pg",
            },
            base_url = %config.base_url,
            "configuration initialized"
        );
        self.config = Some(config);
        Ok(())
    }

    /// The stored configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Uninitialized`] before the first successful
    /// [`init`](ConfigStore::init) - a startup-ordering bug in the caller.
    pub fn get(&self) -> Result<&Config, ConfigError> {
        self.config.as_ref().ok_or(ConfigError::Uninitialized)
    }
}

/// `APP_BASE_URL` with trailing slashes stripped, or the localhost default
/// synthesized from the configured port.
fn base_url_from_env(vars: &EnvVariables) -> String {
    if vars.app_base_url.is_empty() {
        format!("http://localhost:{}", vars.app_port)
    } else {
        vars.app_base_url.trim_end_matches('/').to_string()
    }
}

fn first_non_empty(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Resolve the PostgreSQL host.
///
/// Unset means "no explicit host" and is left to the caller to default. An
/// explicit loopback host is remapped to the Docker host gateway when the
/// process runs inside a container, because the container's loopback does not
/// reach the host machine's services.
fn resolve_postgres_host(vars: &EnvVariables) -> Option<String> {
    if vars.postgres_host.is_empty() {
        return None;
    }

    if vars.running_in_docker && matches!(vars.postgres_host.as_str(), "localhost" | "127.0.0.1") {
        info!(
            host = %vars.postgres_host,
            gateway = DOCKER_HOST_GATEWAY,
            "remapping loopback database host to the docker host gateway"
        );
        return Some(DOCKER_HOST_GATEWAY.to_string());
    }

    Some(vars.postgres_host.clone())
}

/// Select and assemble the database configuration.
///
/// `DB_CLIENT=pg` selects PostgreSQL; anything else falls back to SQLite with
/// the literal configured file path. SQLite gets async stack-trace capture as
/// a diagnostic aid.
fn database_config_from_env(vars: &EnvVariables) -> DatabaseConfig {
    let client = if vars.db_client == "pg" {
        DatabaseClient::Pg {
            database: vars.postgres_database.clone(),
            user: vars.postgres_user.clone(),
            password: vars.postgres_password.clone(),
            host: resolve_postgres_host(vars).unwrap_or_else(|| "localhost".to_string()),
            port: vars.postgres_port,
        }
    } else {
        DatabaseClient::Sqlite {
            database: vars.sqlite_database.clone(),
            async_stack_traces: true,
        }
    };

    DatabaseConfig {
        client,
        slow_query_log_enabled: vars.db_slow_query_log_enabled,
        slow_query_log_min_duration_ms: vars.db_slow_query_log_min_duration,
        auto_migration: vars.db_auto_migration,
    }
}

fn mailer_config_from_env(vars: &EnvVariables) -> MailerConfig {
    MailerConfig {
        enabled: vars.mailer_enabled,
        host: vars.mailer_host.clone(),
        port: vars.mailer_port,
        // TODO: MAILER_SECURE is parsed but ignored; the behaviour being
        // reproduced always enabled TLS regardless of the variable. Decide
        // whether the variable should be honoured before wiring it in here.
        secure: true,
        auth_user: vars.mailer_auth_user.clone(),
        auth_password: vars.mailer_auth_password.clone(),
        noreply_name: vars.mailer_noreply_name.clone(),
        noreply_email: vars.mailer_noreply_email.clone(),
    }
}

/// Merge env-provided Stripe secrets with the static public fields for this
/// environment. Billing is enabled iff a secret key is present.
fn stripe_config_from_env(env: EnvType, vars: &EnvVariables) -> StripeConfig {
    let public = stripe::stripe_public_config(env);
    StripeConfig {
        enabled: !vars.stripe_secret_key.is_empty(),
        publishable_key: public.publishable_key,
        secret_key: vars.stripe_secret_key.clone(),
        webhook_secret: vars.stripe_webhook_secret.clone(),
    }
}

fn is_cloud_hosted(api_base_url: &str) -> bool {
    CLOUD_DOMAINS
        .iter()
        .any(|domain| api_base_url.contains(domain))
}
