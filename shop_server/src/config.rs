use std::env;

use log::*;
use shop_common::parse_boolean_flag;
use stripe_tools::StripeConfig;

const DEFAULT_SHOP_HOST: &str = "127.0.0.1";
const DEFAULT_SHOP_PORT: u16 = 8380;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If false, webhook deliveries are accepted without signature verification. **DANGER**: only ever
    /// disable this in local development.
    pub stripe_signature_checks: bool,
    pub stripe: StripeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SHOP_HOST.to_string(),
            port: DEFAULT_SHOP_PORT,
            database_url: String::default(),
            stripe_signature_checks: true,
            stripe: StripeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SHOP_HOST").ok().unwrap_or_else(|| {
            info!("SHOP_HOST is not set. Using the default.");
            DEFAULT_SHOP_HOST.into()
        });
        let port = env::var("SHOP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("{s} is not a valid port for SHOP_PORT. {e} Using the default.");
                    DEFAULT_SHOP_PORT
                })
            })
            .unwrap_or_else(|_| {
                info!("SHOP_PORT is not set. Using the default.");
                DEFAULT_SHOP_PORT
            });
        let database_url = env::var("SHOP_DATABASE_URL").unwrap_or_else(|_| {
            warn!("SHOP_DATABASE_URL is not set. Using the default.");
            "sqlite://data/shop_store.db".into()
        });
        let stripe_signature_checks = parse_boolean_flag(env::var("SHOP_STRIPE_SIGNATURE_CHECKS").ok(), true);
        if !stripe_signature_checks {
            warn!(
                "🚨️ Stripe signature checks are DISABLED. Unverified webhook deliveries will be accepted. Do not \
                 run like this in production."
            );
        }
        let stripe = StripeConfig::new_from_env_or_default();
        Self { host, port, database_url, stripe_signature_checks, stripe }
    }
}
