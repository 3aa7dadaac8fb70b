//! Static public billing data.
//!
//! Public Stripe fields (the publishable key, and whatever plan data gets
//! added next to it) are not secrets and do not come from the environment.
//! They live in `stripe_public.json`, embedded at compile time and keyed by
//! environment type. Secrets stay in the environment and are merged with
//! these fields when the [`StripeConfig`](super::types::StripeConfig) is
//! assembled.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::env::EnvType;

/// Per-environment public Stripe fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StripePublicConfig {
    #[serde(default)]
    pub publishable_key: String,
}

const STRIPE_PUBLIC_DOC: &str = include_str!("stripe_public.json");

/// Load the public fields for one environment.
///
/// `BuildTypes` reads the dev entry. A malformed document or a missing entry
/// degrades to empty fields with a warning: billing simply stays unconfigured
/// until the document is fixed, matching the permissive policy for optional
/// operational settings.
pub(crate) fn stripe_public_config(env: EnvType) -> StripePublicConfig {
    let key = if env.is_dev() {
        "dev".to_string()
    } else {
        env.to_string()
    };

    let doc: HashMap<String, StripePublicConfig> = match serde_json::from_str(STRIPE_PUBLIC_DOC) {
        Ok(doc) => doc,
        Err(error) => {
            warn!(%error, "could not parse embedded stripe public config");
            return StripePublicConfig::default();
        }
    };

    match doc.get(&key) {
        Some(entry) => entry.clone(),
        None => {
            warn!(env = %env, "no stripe public config entry for environment");
            StripePublicConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_document_has_an_entry_for_every_environment() {
        let doc: HashMap<String, StripePublicConfig> =
            serde_json::from_str(STRIPE_PUBLIC_DOC).unwrap();
        for env in [EnvType::Dev, EnvType::Test, EnvType::Prod] {
            assert!(doc.contains_key(&env.to_string()));
        }
    }

    #[test]
    fn build_types_reads_the_dev_entry() {
        let dev = stripe_public_config(EnvType::Dev);
        let build_types = stripe_public_config(EnvType::BuildTypes);
        assert_eq!(dev.publishable_key, build_types.publishable_key);
    }
}
