use std::sync::Arc;

use log::*;
use reqwest::Client;
use shop_common::{Money, STORE_CURRENCY_CODE};

use crate::{config::StripeConfig, CheckoutSession, StripeApiError};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Creates a hosted Checkout session for the given order. The order id rides along as
    /// `client_reference_id` so that the completion webhook can be tied back to the order.
    pub async fn create_checkout_session(
        &self,
        order_id: i64,
        amount: Money,
    ) -> Result<CheckoutSession, StripeApiError> {
        let params = checkout_session_params(order_id, amount, &self.config.frontend_url);
        let url = format!("{}/v1/checkout/sessions", self.config.api_base);
        trace!("Creating checkout session for order #{order_id} at {url}");
        let response = self
            .client
            .post(url)
            .basic_auth(self.config.secret_key.reveal(), None::<&str>)
            .form(&params)
            .send()
            .await
            .map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| StripeApiError::RestResponseError(e.to_string()))?;
            return Err(StripeApiError::QueryError { status, message });
        }
        let session =
            response.json::<CheckoutSession>().await.map_err(|e| StripeApiError::JsonError(e.to_string()))?;
        info!("💳️ Checkout session {} created for order #{order_id} ({amount})", session.id);
        Ok(session)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }
}

/// The form parameters for a one-off payment Checkout session. Split out from the HTTP call so the encoding
/// can be tested without a live endpoint.
fn checkout_session_params(order_id: i64, amount: Money, frontend_url: &str) -> Vec<(String, String)> {
    vec![
        ("mode".to_string(), "payment".to_string()),
        ("client_reference_id".to_string(), order_id.to_string()),
        ("success_url".to_string(), format!("{frontend_url}/success?session_id={{CHECKOUT_SESSION_ID}}")),
        ("cancel_url".to_string(), format!("{frontend_url}/cancel")),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("line_items[0][price_data][currency]".to_string(), STORE_CURRENCY_CODE.to_string()),
        ("line_items[0][price_data][unit_amount]".to_string(), amount.value().to_string()),
        ("line_items[0][price_data][product_data][name]".to_string(), format!("Order #{order_id}")),
    ]
}
