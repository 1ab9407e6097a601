use serde::{Deserialize, Serialize};

/// The event type that drives order reconciliation. Every other event type is acknowledged and ignored.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// The slice of a hosted Checkout session the storefront cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// The hosted payment page the buyer gets redirected to.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventObject {
    pub id: String,
    /// Round-trips the order id through Stripe. Set at session creation, read back at reconciliation.
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

/// A Stripe webhook event, deserialized only as far as reconciliation needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

impl StripeEvent {
    pub fn is_checkout_completed(&self) -> bool {
        self.event_type == CHECKOUT_SESSION_COMPLETED
    }

    pub fn order_reference(&self) -> Option<&str> {
        self.data.object.client_reference_id.as_deref()
    }
}
