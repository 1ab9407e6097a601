use chrono::Utc;
use shop_common::Money;
use shop_engine::{
    db_types::{Order, OrderLine, OrderStatus},
    shop_objects::{CartContents, CartLineView, OrderWithItems},
};

pub fn cart_with_one_line(product_id: i64, quantity: i64, unit_price: Money) -> CartContents {
    CartContents::new(vec![CartLineView {
        id: 1,
        product_id,
        product_name: "Green tea".to_string(),
        quantity,
        unit_price,
    }])
}

pub fn order_fixture(id: i64, user_id: i64, status: OrderStatus, total: Money) -> OrderWithItems {
    let now = Utc::now();
    let order = Order {
        id,
        user_id,
        status,
        total,
        created_at: now,
        updated_at: now,
        paid_at: matches!(status, OrderStatus::Paid).then_some(now),
    };
    let items = vec![OrderLine {
        id: 1,
        order_id: id,
        product_id: 1,
        product_name: "Green tea".to_string(),
        quantity: 2,
        unit_price: Money::from_minor_units(total.value() / 2),
    }];
    OrderWithItems::new(order, items)
}

/// A `checkout.session.completed` body for webhook tests. Sign it with
/// [`stripe_tools::webhook::signature_header`] before delivery.
pub fn completed_event_body(reference: Option<&str>) -> Vec<u8> {
    let reference = match reference {
        Some(r) => format!("\"{r}\""),
        None => "null".to_string(),
    };
    format!(
        r#"{{"id":"evt_1","type":"checkout.session.completed","data":{{"object":{{"id":"cs_1","client_reference_id":{reference}}}}}}}"#
    )
    .into_bytes()
}
