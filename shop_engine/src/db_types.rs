use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use shop_common::Money;
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------     OrderStatus       -------------------------------------------------------
/// The order state machine.
///
/// `Draft → Pending → Paid → Shipped → Delivered`, with `Cancelled` reachable from `Draft` or `Pending` only.
/// Client-initiated status updates are restricted to the `Draft`/`Pending` band plus `Cancelled`; `Paid` is only
/// ever set by the webhook reconciler once the payment provider has confirmed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order has been created from a cart snapshot but not yet confirmed by the buyer.
    Draft,
    /// The buyer has confirmed the order, but no payment has been received.
    Pending,
    /// The payment provider has confirmed payment in full.
    Paid,
    /// The order has been shipped.
    Shipped,
    /// The order has been delivered.
    Delivered,
    /// The order was cancelled by the buyer before payment.
    Cancelled,
}

impl OrderStatus {
    /// An open order is one the buyer can still modify, delete or pay for.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::Draft | OrderStatus::Pending)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Draft => write!(f, "Draft"),
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Draft");
            OrderStatus::Draft
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        User          -------------------------------------------------------
/// A registered buyer. Authentication and profile management live upstream; the core only reads these rows to
/// assert that an owner id refers to a real user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Product        -------------------------------------------------------
/// A catalog product. Catalog CRUD is an external collaborator; the core resolves products by id for their
/// current price and name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// The current catalog price, in minor units.
    pub price: Money,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       CartLine       -------------------------------------------------------
/// One product/quantity entry in a buyer's basket. Unique per (owner, product); repeat adds increment the
/// quantity instead of creating a second line.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLine {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        Order         -------------------------------------------------------
/// An immutable order created from a cart snapshot. The total is fixed at creation time and is never recomputed
/// from live catalog prices. Only status transitions mutate an order after creation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

//--------------------------------------      OrderLine       -------------------------------------------------------
/// A frozen order line. Product name and unit price are snapshots taken at order creation; later catalog changes
/// never touch these rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity
    }
}

//--------------------------------------     NewOrderLine     -------------------------------------------------------
/// The snapshot data captured from a cart line at checkout, before it has been persisted.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl NewOrderLine {
    pub fn subtotal(&self) -> Money {
        self.unit_price * self.quantity
    }
}
