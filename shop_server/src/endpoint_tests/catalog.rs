use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::Utc;
use shop_common::Money;
use shop_engine::{db_types::Product, CatalogApi};

use super::mocks::MockCatalog;
use crate::routes::ProductByIdRoute;

#[actix_web::test]
async fn product_lookup() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_product().returning(|id| match id {
        7 => {
            let now = Utc::now();
            Ok(Some(Product {
                id: 7,
                name: "Green tea".to_string(),
                price: Money::from_decimal_str("4.50").unwrap(),
                stock: 100,
                created_at: now,
                updated_at: now,
            }))
        },
        _ => Ok(None),
    });
    let app =
        App::new().app_data(web::Data::new(CatalogApi::new(catalog))).service(ProductByIdRoute::<MockCatalog>::new());
    let service = test::init_service(app).await;

    let req = TestRequest::get().uri("/products/7").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["name"], "Green tea");
    assert_eq!(body["price"], 450);

    let req = TestRequest::get().uri("/products/8").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
