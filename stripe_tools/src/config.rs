use std::time::Duration;

use log::*;
use shop_common::Secret;

const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub api_base: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
    pub frontend_url: String,
    /// Hard deadline on every outbound Stripe call. There are no retries; a timed-out session creation
    /// surfaces to the caller.
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
            frontend_url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_base = std::env::var("SHOP_STRIPE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let secret_key = Secret::new(std::env::var("SHOP_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("SHOP_STRIPE_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("SHOP_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("SHOP_STRIPE_WEBHOOK_SECRET not set, using (probably useless) default");
            "whsec_00000000000000".to_string()
        }));
        let frontend_url = std::env::var("SHOP_FRONTEND_URL").unwrap_or_else(|_| {
            warn!("SHOP_FRONTEND_URL not set, using http://localhost:3000 as default");
            "http://localhost:3000".to_string()
        });
        let timeout = std::env::var("SHOP_STRIPE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { api_base, secret_key, webhook_secret, frontend_url, timeout }
    }
}
