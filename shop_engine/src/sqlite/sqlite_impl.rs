//! `SqliteDatabase` is a concrete implementation of a storefront engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module. Conflicting operations on the same owner or order serialize through the database (upserts and
//! conditional updates), never through process-wide locks.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{carts, db_url, new_pool, orders, products, users};
use crate::{
    db_types::{NewOrderLine, Order, OrderStatus, Product},
    shop_objects::{CartContents, OrderWithItems},
    traits::{CartManagement, OrderManagement, ProductCatalog, ReconciliationOutcome, StorefrontError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }
}

impl CartManagement for SqliteDatabase {
    async fn add_cart_item(
        &self,
        owner: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartContents, StorefrontError> {
        let mut tx = self.pool.begin().await?;
        users::fetch_user(owner, &mut tx).await?.ok_or_else(|| StorefrontError::not_found("User"))?;
        products::fetch_product(product_id, &mut tx)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Product"))?;
        carts::upsert_cart_item(owner, product_id, quantity, &mut tx).await?;
        let cart = cart_contents(owner, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn update_cart_item_quantity(
        &self,
        owner: i64,
        line_id: i64,
        quantity: i64,
    ) -> Result<CartContents, StorefrontError> {
        let mut tx = self.pool.begin().await?;
        let line = owned_cart_line(owner, line_id, &mut tx).await?;
        carts::set_quantity(line.id, quantity, &mut tx)
            .await?
            .ok_or_else(|| StorefrontError::not_found("Cart item"))?;
        let cart = cart_contents(owner, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn remove_cart_item(&self, owner: i64, line_id: i64) -> Result<CartContents, StorefrontError> {
        let mut tx = self.pool.begin().await?;
        let line = owned_cart_line(owner, line_id, &mut tx).await?;
        carts::delete_cart_line(line.id, &mut tx).await?;
        let cart = cart_contents(owner, &mut tx).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn fetch_cart(&self, owner: i64) -> Result<CartContents, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        users::fetch_user(owner, &mut conn).await?.ok_or_else(|| StorefrontError::not_found("User"))?;
        cart_contents(owner, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    /// The cart → order hand-off. Reading the cart, freezing the lines, inserting the order and clearing the
    /// cart are one transaction: a crash mid-sequence leaves either the untouched cart or the complete order,
    /// never both and never neither.
    async fn checkout_cart(&self, owner: i64) -> Result<OrderWithItems, StorefrontError> {
        let mut tx = self.pool.begin().await?;
        users::fetch_user(owner, &mut tx).await?.ok_or_else(|| StorefrontError::not_found("User"))?;
        let cart = cart_contents(owner, &mut tx).await?;
        if cart.is_empty() {
            return Err(StorefrontError::not_found("The cart is empty"));
        }
        let snapshot = cart
            .lines
            .iter()
            .map(|l| NewOrderLine {
                product_id: l.product_id,
                product_name: l.product_name.clone(),
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect::<Vec<_>>();
        let total = snapshot.iter().map(NewOrderLine::subtotal).sum();
        let order = orders::insert_order(owner, total, &mut tx).await?;
        let items = orders::insert_order_lines(order.id, &snapshot, &mut tx).await?;
        let cleared = carts::clear_cart(owner, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Checkout for user #{owner}: order #{} created, {cleared} cart lines cleared", order.id);
        Ok(OrderWithItems::new(order, items))
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderWithItems>, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        let order = match orders::fetch_order(order_id, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        let items = orders::fetch_order_lines(order_id, &mut conn).await?;
        Ok(Some(OrderWithItems::new(order, items)))
    }

    async fn fetch_orders_for_user(&self, owner: i64) -> Result<Vec<OrderWithItems>, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(owner, &mut conn).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = orders::fetch_order_lines(order.id, &mut conn).await?;
            result.push(OrderWithItems::new(order, items));
        }
        Ok(result)
    }

    async fn delete_order_if_open(&self, order_id: i64) -> Result<bool, StorefrontError> {
        let mut tx = self.pool.begin().await?;
        let deleted = orders::delete_order_if_open(order_id, &mut tx).await?;
        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Option<Order>, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_status_if_open(order_id, status, &mut conn).await?;
        Ok(order)
    }

    async fn mark_order_paid(&self, order_id: i64) -> Result<ReconciliationOutcome, StorefrontError> {
        let mut conn = self.pool.acquire().await?;
        match orders::mark_paid(order_id, &mut conn).await? {
            Some(order) => Ok(ReconciliationOutcome::MarkedPaid(order)),
            None => {
                // Either the order is already paid, or it does not exist at all.
                let order = orders::fetch_order(order_id, &mut conn)
                    .await?
                    .ok_or_else(|| StorefrontError::NotFound(format!("Order #{order_id}")))?;
                Ok(ReconciliationOutcome::AlreadyPaid(order))
            },
        }
    }
}

/// Fetches the cart line and asserts it belongs to `owner`. The caller holds the surrounding transaction.
async fn owned_cart_line(
    owner: i64,
    line_id: i64,
    conn: &mut sqlx::SqliteConnection,
) -> Result<crate::db_types::CartLine, StorefrontError> {
    users::fetch_user(owner, conn).await?.ok_or_else(|| StorefrontError::not_found("User"))?;
    let line = carts::fetch_cart_line(line_id, conn).await?.ok_or_else(|| StorefrontError::not_found("Cart item"))?;
    if line.user_id != owner {
        warn!("🛒️ User #{owner} tried to modify cart line #{line_id} belonging to user #{}", line.user_id);
        return Err(StorefrontError::Forbidden("The cart item does not belong to this user".to_string()));
    }
    Ok(line)
}

/// Builds the live-priced cart view, checking that every raw line still resolves to a catalog product.
async fn cart_contents(owner: i64, conn: &mut sqlx::SqliteConnection) -> Result<CartContents, StorefrontError> {
    let lines = carts::cart_lines_with_products(owner, conn).await?;
    let raw_count = carts::count_cart_lines(owner, conn).await?;
    if raw_count != lines.len() as i64 {
        error!("🗃️ Cart for user #{owner} references a product that no longer resolves in the catalog");
        return Err(StorefrontError::DatabaseError(
            "Cart references a product that no longer exists".to_string(),
        ));
    }
    Ok(CartContents::new(lines))
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
