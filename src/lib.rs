//! Server configuration for a note-synchronization service.
//!
//! This crate turns the process environment into one immutable, strongly
//! typed [`Config`] record that the rest of the server consumes. Parsing is
//! permissive by design: optional settings fall back to documented defaults,
//! and only three things fail hard - reading the store before it is
//! initialized, non-numeric text in a numeric variable, and an unrecognized
//! route-type tag.
//!
//! # Usage
//!
//! The startup routine owns a [`ConfigStore`], initializes it once from the
//! captured environment, and hands `&Config` to every consumer:
//!
//! ```
//! use std::collections::HashMap;
//! use joplin_server_config::{ConfigStore, EnvType};
//!
//! let mut raw: HashMap<String, String> = HashMap::new();
//! raw.insert("APP_BASE_URL".to_string(), "https://notes.example.com".to_string());
//! let mut store = ConfigStore::new();
//! store.init(EnvType::Dev, &raw, None)?;
//! let config = store.get()?;
//! assert_eq!(config.base_url, "https://notes.example.com");
//! # Ok::<(), joplin_server_config::ConfigError>(())
//! ```

mod config;
mod env;
mod error;

pub use config::{
    Config, ConfigOverrides, ConfigStore, DatabaseClient, DatabaseConfig, DOCKER_HOST_GATEWAY,
    MailerConfig, RouteType, StripeConfig,
};
pub use env::{EnvType, EnvVariables};
pub use error::ConfigError;
