//! Payment-provider routes: outbound checkout-session creation and the inbound webhook.
//!
//! The webhook handler is the only place in the system that can move an order to `Paid`. Signature
//! verification runs against the raw request bytes before anything is parsed; an unverified delivery is
//! rejected with a 400 and triggers no processing at all. Once a delivery is verified, the handler always
//! acknowledges with a 200, otherwise the provider keeps retrying deliveries we have already dealt with.
use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use shop_common::Money;
use shop_engine::{traits::OrderManagement, OrderFlowApi};
use stripe_tools::{
    webhook,
    CheckoutSession,
    StripeApi,
    StripeApiError,
    StripeConfig,
    StripeEvent,
};

use crate::{
    auth::OwnerId,
    data_objects::{CheckoutSessionResponse, JsonResponse, PaymentRequest},
    errors::ServerError,
    route,
};

/// The seam between the server and the payment provider. [`StripeGateway`] is the production implementation;
/// endpoint tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    async fn checkout_session(&self, order_id: i64, amount: Money) -> Result<CheckoutSession, StripeApiError>;
    /// Verifies the delivery against the raw body and parses it. Must be called before any other processing.
    fn verify_webhook(&self, signature_header: Option<&str>, body: &[u8]) -> Result<StripeEvent, StripeApiError>;
}

#[derive(Clone)]
pub struct StripeGateway {
    api: StripeApi,
    signature_checks: bool,
}

impl StripeGateway {
    pub fn new(config: StripeConfig, signature_checks: bool) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api, signature_checks })
    }
}

impl PaymentProvider for StripeGateway {
    async fn checkout_session(&self, order_id: i64, amount: Money) -> Result<CheckoutSession, StripeApiError> {
        self.api.create_checkout_session(order_id, amount).await
    }

    fn verify_webhook(&self, signature_header: Option<&str>, body: &[u8]) -> Result<StripeEvent, StripeApiError> {
        if self.signature_checks {
            let header = signature_header
                .ok_or_else(|| StripeApiError::InvalidSignature("No Stripe-Signature header".to_string()))?;
            webhook::verify_signature(
                self.api.config().webhook_secret.reveal(),
                header,
                body,
                webhook::DEFAULT_TOLERANCE_SECS,
            )?;
        } else {
            warn!("🚨️ Accepting webhook delivery without signature verification");
        }
        webhook::parse_event(body)
    }
}

//----------------------------------------------   Checkout session  -------------------------------------------------
route!(create_checkout_session => Post "/payments/create-checkout-session" impl OrderManagement, PaymentProvider);
/// Creates a hosted checkout session for one of the buyer's open orders and returns the redirect URL. The
/// order id is handed to the provider as the session's client reference, which is how the completion webhook
/// finds its way back to the order.
pub async fn create_checkout_session<BOrd, PProv>(
    owner: OwnerId,
    body: web::Json<PaymentRequest>,
    orders: web::Data<OrderFlowApi<BOrd>>,
    provider: web::Data<PProv>,
) -> Result<HttpResponse, ServerError>
where
    BOrd: OrderManagement,
    PProv: PaymentProvider,
{
    let order_id = body.into_inner().order_id;
    trace!("💳️ POST create-checkout-session for order #{order_id} by user #{}", owner.0);
    let order = orders.order(owner.0, order_id).await?;
    if !order.order.status.is_open() {
        return Err(ServerError::BadRequest(format!(
            "Order #{order_id} is {} and cannot be paid for",
            order.order.status
        )));
    }
    let session = provider.checkout_session(order.order.id, order.order.total).await?;
    info!("💳️ Checkout session created for order #{order_id}");
    Ok(HttpResponse::Ok().json(CheckoutSessionResponse { checkout_url: session.url }))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(stripe_webhook => Post "/payments/webhook" impl OrderManagement, PaymentProvider);
pub async fn stripe_webhook<BOrd, PProv>(
    req: HttpRequest,
    body: web::Bytes,
    orders: web::Data<OrderFlowApi<BOrd>>,
    provider: web::Data<PProv>,
) -> Result<HttpResponse, ServerError>
where
    BOrd: OrderManagement,
    PProv: PaymentProvider,
{
    trace!("💳️ Received webhook request: {}", req.uri());
    let signature = req.headers().get("Stripe-Signature").and_then(|v| v.to_str().ok());
    let event = match provider.verify_webhook(signature, &body) {
        Ok(event) => event,
        Err(StripeApiError::InvalidSignature(s)) => {
            warn!("💳️ Rejecting webhook delivery. {s}");
            return Err(ServerError::InvalidSignature(s));
        },
        // The delivery is authentic but the payload is not usable. Acknowledge it, or the provider will
        // redeliver the same unusable body forever.
        Err(e) => {
            warn!("💳️ Verified webhook body could not be processed. {e}");
            return Ok(HttpResponse::Ok().json(JsonResponse::failure("Unprocessable event payload")));
        },
    };
    // From here on, responses must be in the 200 range, otherwise the provider will retry
    let result = process_event(event, orders.as_ref()).await;
    Ok(HttpResponse::Ok().json(result))
}

async fn process_event<B: OrderManagement>(event: StripeEvent, orders: &OrderFlowApi<B>) -> JsonResponse {
    if !event.is_checkout_completed() {
        trace!("💳️ Ignoring webhook event {} ({})", event.id, event.event_type);
        return JsonResponse::success(format!("Event {} ignored", event.event_type));
    }
    let order_id = match event.order_reference().map(str::parse::<i64>) {
        Some(Ok(id)) => id,
        reference => {
            warn!("💳️ Completed session {} carries no usable order reference ({reference:?})", event.id);
            return JsonResponse::failure("No usable order reference in event");
        },
    };
    match orders.order_paid(order_id).await {
        Ok(_) => JsonResponse::success(format!("Order #{order_id} reconciled")),
        Err(shop_engine::traits::StorefrontError::NotFound(s)) => {
            info!("💳️ Payment confirmation for unknown order #{order_id}. {s}");
            JsonResponse::failure(format!("Order #{order_id} not known"))
        },
        Err(e) => {
            warn!("💳️ Unexpected error while reconciling order #{order_id}. {e}");
            JsonResponse::failure("Unexpected error reconciling order")
        },
    }
}
