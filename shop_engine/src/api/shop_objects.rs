//! View objects returned by the engine APIs. These are the shapes that ultimately serialize onto the REST
//! surface, so they carry `serde` derives.

use serde::{Deserialize, Serialize};
use shop_common::Money;
use sqlx::FromRow;

use crate::db_types::{Order, OrderLine};

//--------------------------------------     CartLineView      ------------------------------------------------------
/// A cart line joined with live product data. The price here is the *current* catalog price, not a snapshot;
/// prices are only frozen at checkout.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLineView {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl CartLineView {
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity
    }
}

//--------------------------------------     CartContents      ------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartContents {
    pub lines: Vec<CartLineView>,
    pub total: Money,
}

impl CartContents {
    pub fn new(lines: Vec<CartLineView>) -> Self {
        let total = lines.iter().map(CartLineView::subtotal).sum();
        Self { lines, total }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

//--------------------------------------     OrderWithItems     -----------------------------------------------------
/// An order together with its frozen lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

impl OrderWithItems {
    pub fn new(order: Order, items: Vec<OrderLine>) -> Self {
        Self { order, items }
    }
}
