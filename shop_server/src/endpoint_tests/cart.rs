use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use serde_json::json;
use shop_common::Money;
use shop_engine::CartApi;

use super::{helpers::cart_with_one_line, mocks::MockCartBackend};
use crate::routes::{AddCartItemRoute, GetCartRoute, UpdateCartQuantityRoute};

#[actix_web::test]
async fn add_item_returns_the_cart() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockCartBackend::new();
    backend
        .expect_add_cart_item()
        .withf(|owner, product, qty| (*owner, *product, *qty) == (1, 7, 2))
        .returning(|_, _, _| Ok(cart_with_one_line(7, 2, Money::from_decimal_str("4.50").unwrap())));
    let app = App::new()
        .app_data(web::Data::new(CartApi::new(backend)))
        .service(AddCartItemRoute::<MockCartBackend>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/cart/add")
        .insert_header(("x-user-id", "1"))
        .set_json(json!({"product_id": 7, "quantity": 2}))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["lines"][0]["quantity"], 2);
    assert_eq!(body["total"], 900);
}

#[actix_web::test]
async fn missing_identity_header_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    // The extractor runs before the handler, so the backend must never be touched.
    let backend = MockCartBackend::new();
    let app =
        App::new().app_data(web::Data::new(CartApi::new(backend))).service(GetCartRoute::<MockCartBackend>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::get().uri("/cart").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get().uri("/cart").insert_header(("x-user-id", "not-a-number")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn non_positive_quantity_is_rejected_before_the_backend() {
    let _ = env_logger::try_init().ok();
    let backend = MockCartBackend::new();
    let app = App::new()
        .app_data(web::Data::new(CartApi::new(backend)))
        .service(AddCartItemRoute::<MockCartBackend>::new())
        .service(UpdateCartQuantityRoute::<MockCartBackend>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::post()
        .uri("/cart/add")
        .insert_header(("x-user-id", "1"))
        .set_json(json!({"product_id": 7, "quantity": 0}))
        .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::put().uri("/cart/3/quantity/-2").insert_header(("x-user-id", "1")).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("Quantity must be greater than zero"));
}
