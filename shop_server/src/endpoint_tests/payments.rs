use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Utc;
use serde_json::json;
use shop_common::{Money, Secret};
use shop_engine::{db_types::OrderStatus, traits::ReconciliationOutcome, OrderFlowApi};
use stripe_tools::{webhook::signature_header, StripeConfig};

use super::{
    helpers::{completed_event_body, order_fixture},
    mocks::{MockOrderBackend, StubProvider},
};
use crate::stripe_routes::{CreateCheckoutSessionRoute, StripeGateway, StripeWebhookRoute};

const WEBHOOK_SECRET: &str = "whsec_test_secret";

fn gateway() -> StripeGateway {
    let config = StripeConfig { webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()), ..Default::default() };
    StripeGateway::new(config, true).expect("Error creating gateway")
}

fn signed(body: &[u8]) -> String {
    signature_header(WEBHOOK_SECRET, Utc::now().timestamp(), body)
}

//----------------------------------------------   Checkout sessions  ------------------------------------------------

#[actix_web::test]
async fn checkout_session_for_an_open_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|_| Ok(Some(order_fixture(42, 1, OrderStatus::Pending, Money::from_decimal_str("20.00").unwrap()))));
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(backend)))
        .app_data(web::Data::new(StubProvider::with_session("https://checkout.stripe.com/c/pay/cs_test_1")))
        .service(CreateCheckoutSessionRoute::<MockOrderBackend, StubProvider>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/payments/create-checkout-session")
        .insert_header(("x-user-id", "1"))
        .set_json(json!({"orderId": 42}))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["checkoutUrl"], "https://checkout.stripe.com/c/pay/cs_test_1");
}

#[actix_web::test]
async fn no_checkout_session_for_paid_orders() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|_| Ok(Some(order_fixture(42, 1, OrderStatus::Paid, Money::from_whole_units(20)))));
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(backend)))
        .app_data(web::Data::new(StubProvider::failing("must not be called")))
        .service(CreateCheckoutSessionRoute::<MockOrderBackend, StubProvider>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/payments/create-checkout-session")
        .insert_header(("x-user-id", "1"))
        .set_json(json!({"orderId": 42}))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn provider_failure_maps_to_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|_| Ok(Some(order_fixture(42, 1, OrderStatus::Draft, Money::from_whole_units(20)))));
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(backend)))
        .app_data(web::Data::new(StubProvider::failing("connection timed out")))
        .service(CreateCheckoutSessionRoute::<MockOrderBackend, StubProvider>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/payments/create-checkout-session")
        .insert_header(("x-user-id", "1"))
        .set_json(json!({"orderId": 42}))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

//----------------------------------------------   Webhook  ----------------------------------------------------

fn webhook_app(
    backend: MockOrderBackend,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(OrderFlowApi::new(backend)))
        .app_data(web::Data::new(gateway()))
        .service(StripeWebhookRoute::<MockOrderBackend, StripeGateway>::new())
}

#[actix_web::test]
async fn unsigned_deliveries_are_rejected_without_processing() {
    let _ = env_logger::try_init().ok();
    // No mark_order_paid expectation: the backend must not be touched.
    let backend = MockOrderBackend::new();
    let service = test::init_service(webhook_app(backend)).await;
    let body = completed_event_body(Some("42"));

    let req = TestRequest::post().uri("/payments/webhook").set_payload(body.clone()).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("Stripe-Signature", format!("t={},v1={}", Utc::now().timestamp(), "00".repeat(32))))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn completed_session_marks_the_order_paid() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend.expect_mark_order_paid().withf(|id| *id == 42).times(1).returning(|id| {
        Ok(ReconciliationOutcome::MarkedPaid(order_fixture(id, 1, OrderStatus::Paid, Money::from_whole_units(20)).order))
    });
    let service = test::init_service(webhook_app(backend)).await;
    let body = completed_event_body(Some("42"));

    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("Stripe-Signature", signed(&body)))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn duplicate_deliveries_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    let mut first = true;
    backend.expect_mark_order_paid().times(2).returning(move |id| {
        let order = order_fixture(id, 1, OrderStatus::Paid, Money::from_whole_units(20)).order;
        let outcome = if first { ReconciliationOutcome::MarkedPaid(order) } else { ReconciliationOutcome::AlreadyPaid(order) };
        first = false;
        Ok(outcome)
    });
    let service = test::init_service(webhook_app(backend)).await;
    let body = completed_event_body(Some("42"));

    for _ in 0..2 {
        let req = TestRequest::post()
            .uri("/payments/webhook")
            .insert_header(("Stripe-Signature", signed(&body)))
            .set_payload(body.clone())
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK, "Redelivery must still be acknowledged");
    }
}

#[actix_web::test]
async fn unknown_orders_and_bad_references_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_mark_order_paid()
        .withf(|id| *id == 999)
        .times(1)
        .returning(|id| Err(shop_engine::traits::StorefrontError::NotFound(format!("Order #{id}"))));
    let service = test::init_service(webhook_app(backend)).await;

    // Unknown order: logged and acknowledged so the provider stops retrying.
    let body = completed_event_body(Some("999"));
    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("Stripe-Signature", signed(&body)))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(response["success"], false);

    // Missing and malformed references never reach the backend.
    for reference in [None, Some("not-an-id")] {
        let body = completed_event_body(reference);
        let req = TestRequest::post()
            .uri("/payments/webhook")
            .insert_header(("Stripe-Signature", signed(&body)))
            .set_payload(body)
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let response: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(response["success"], false);
    }
}

#[actix_web::test]
async fn garbled_but_authentic_deliveries_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    // No mark_order_paid expectation: an unparsable body never reaches the backend.
    let backend = MockOrderBackend::new();
    let service = test::init_service(webhook_app(backend)).await;
    let body = b"this is not json".to_vec();

    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("Stripe-Signature", signed(&body)))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK, "A verified delivery must be acknowledged even when unparsable");
    let response: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(response["success"], false);
}

#[actix_web::test]
async fn other_event_types_are_ignored() {
    let _ = env_logger::try_init().ok();
    let backend = MockOrderBackend::new();
    let service = test::init_service(webhook_app(backend)).await;
    let body = br#"{"id":"evt_9","type":"invoice.paid","data":{"object":{"id":"in_1"}}}"#.to_vec();

    let req = TestRequest::post()
        .uri("/payments/webhook")
        .insert_header(("Stripe-Signature", signed(&body)))
        .set_payload(body)
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let response: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(response["success"], true);
}
