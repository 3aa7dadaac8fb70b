//! config-check - load the server configuration and print what the server
//! would actually run with.
//!
//! Meant for operators: run it with the same environment (and `.env` file)
//! as the server to see the derived values and catch misconfiguration before
//! a deploy. Secrets are reported by presence only, never echoed.
//!
//! # Startup Flow
//!
//! 1. Load `.env` if present
//! 2. Initialize logging
//! 3. Capture the process environment and pick the environment type
//! 4. Build the configuration store
//! 5. Log a redacted summary

use std::collections::HashMap;

use tracing_subscriber::EnvFilter;

use joplin_server_config::{ConfigStore, DatabaseClient, EnvType, RouteType};

fn main() -> anyhow::Result<()> {
    // Try to load .env file if it exists (does nothing if not found)
    dotenvy::dotenv().ok();

    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let raw: HashMap<String, String> = std::env::vars().collect();

    // APP_ENV selects the environment type; anything unrecognized is dev.
    let env_type = raw
        .get("APP_ENV")
        .map(|value| EnvType::from_str_or_dev(value))
        .unwrap_or(EnvType::Dev);

    let mut store = ConfigStore::new();
    store.init(env_type, &raw, None)?;
    let config = store.get()?;

    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        env = %config.env,
        port = config.port,
        docker = config.running_in_docker(),
        "loaded configuration"
    );
    tracing::info!(
        web = config.base_url_for(RouteType::Web),
        api = config.base_url_for(RouteType::Api),
        user_content = config.base_url_for(RouteType::UserContent),
        shared_origin = config.show_item_urls(),
        cloud = config.is_cloud_hosted,
        "base urls"
    );

    match &config.database.client {
        DatabaseClient::Sqlite { database, .. } => {
            tracing::info!(client = "sqlite", path = %database, auto_migration = config.database.auto_migration, "database");
        }
        DatabaseClient::Pg {
            database,
            user,
            host,
            port,
            ..
        } => {
            tracing::info!(client = "pg", %database, %user, %host, port, auto_migration = config.database.auto_migration, "database");
        }
    }

    tracing::info!(
        enabled = config.mailer.enabled,
        host = %config.mailer.host,
        port = config.mailer.port,
        secure = config.mailer.secure,
        "mailer"
    );
    tracing::info!(
        enabled = config.stripe.enabled,
        secret_key_set = !config.stripe.secret_key.is_empty(),
        webhook_secret_set = !config.stripe.webhook_secret.is_empty(),
        "stripe"
    );

    Ok(())
}
