use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use shop_common::Money;
use shop_engine::{db_types::OrderStatus, OrderFlowApi};

use super::{helpers::order_fixture, mocks::MockOrderBackend};
use crate::routes::{CreateOrderRoute, DeleteOrderRoute, OrderByIdRoute, UpdateOrderStatusRoute};

fn service_app(
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
        .service(CreateOrderRoute::<MockOrderBackend>::new())
        .service(OrderByIdRoute::<MockOrderBackend>::new())
        .service(DeleteOrderRoute::<MockOrderBackend>::new())
        .service(UpdateOrderStatusRoute::<MockOrderBackend>::new())
}

#[actix_web::test]
async fn checkout_creates_an_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_checkout_cart()
        .withf(|owner| *owner == 1)
        .returning(|_| Ok(order_fixture(42, 1, OrderStatus::Draft, Money::from_decimal_str("20.00").unwrap())));
    let service = test::init_service(service_app(backend)).await;

    let req = TestRequest::post().uri("/orders").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["id"], 42);
    assert_eq!(body["status"], "Draft");
    assert_eq!(body["total"], 2000);
}

#[actix_web::test]
async fn foreign_orders_are_forbidden_and_unknown_orders_are_not_found() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|id| match id {
            42 => Ok(Some(order_fixture(42, 1, OrderStatus::Draft, Money::from_whole_units(20)))),
            _ => Ok(None),
        });
    let service = test::init_service(service_app(backend)).await;

    // Order 42 belongs to user 1, not user 2
    let req = TestRequest::get().uri("/orders/42").insert_header(("x-user-id", "2")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/orders/99").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn paid_orders_cannot_be_deleted() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|_| Ok(Some(order_fixture(42, 1, OrderStatus::Paid, Money::from_whole_units(20)))));
    // delete_order_if_open must never be called for an order that is already paid
    let service = test::init_service(service_app(backend)).await;

    let req = TestRequest::delete().uri("/orders/42").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn buyers_cannot_set_the_paid_status() {
    let _ = env_logger::try_init().ok();
    // The target status is vetted before the order is even fetched.
    let backend = MockOrderBackend::new();
    let service = test::init_service(service_app(backend)).await;

    let req = TestRequest::put().uri("/orders/42/status?status=Paid").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelling_an_open_order() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockOrderBackend::new();
    backend
        .expect_fetch_order()
        .returning(|_| Ok(Some(order_fixture(42, 1, OrderStatus::Pending, Money::from_whole_units(20)))));
    backend
        .expect_set_order_status()
        .withf(|id, status| *id == 42 && *status == OrderStatus::Cancelled)
        .returning(|id, status| {
            let mut order = order_fixture(id, 1, status, Money::from_whole_units(20)).order;
            order.status = status;
            Ok(Some(order))
        });
    let service = test::init_service(service_app(backend)).await;

    let req =
        TestRequest::put().uri("/orders/42/status?status=Cancelled").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "Cancelled");
}
