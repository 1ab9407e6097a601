use log::debug;
use shop_common::Money;
use sqlx::SqliteConnection;

use crate::db_types::{NewOrderLine, Order, OrderLine, OrderStatus};

/// Inserts a new `Draft` order for the user. This is not atomic on its own; checkout embeds it in a
/// transaction together with the line inserts and the cart clear.
pub async fn insert_order(user_id: i64, total: Money, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as("INSERT INTO orders (user_id, total) VALUES ($1, $2) RETURNING *")
        .bind(user_id)
        .bind(total)
        .fetch_one(conn)
        .await?;
    debug!("📝️ Order #{} inserted for user #{user_id} with total {total}", order.id);
    Ok(order)
}

pub async fn insert_order_lines(
    order_id: i64,
    lines: &[NewOrderLine],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderLine>, sqlx::Error> {
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        let row = sqlx::query_as(
            r#"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *;
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.product_name.as_str())
        .bind(line.quantity)
        .bind(line.unit_price)
        .fetch_one(&mut *conn)
        .await?;
        result.push(row);
    }
    Ok(result)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_lines(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, sqlx::Error> {
    let lines = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(lines)
}

/// All orders for the user, oldest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at ASC, id ASC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Deletes the order and its lines iff the order is still in the open (`Draft`/`Pending`) band. The guard is
/// part of the delete statement, so a concurrent paid transition wins the race. Returns the number of order
/// rows deleted (0 or 1).
pub async fn delete_order_if_open(order_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM order_items WHERE order_id = $1 AND (SELECT status FROM orders WHERE id = $1) IN ('Draft', 'Pending')")
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    let res = sqlx::query("DELETE FROM orders WHERE id = $1 AND status IN ('Draft', 'Pending')")
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

/// Conditionally overwrites the status of an open order. Returns `None` if the order does not exist or has
/// already left the open band.
pub async fn update_status_if_open(
    order_id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status IN ('Draft', 'Pending')
            RETURNING *;
        "#,
    )
    .bind(status.to_string())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// The conditional paid transition. A single statement, so two concurrent confirmations for the same order
/// cannot both apply it. Returns `None` when the order was already `Paid` (or does not exist; callers
/// disambiguate with a follow-up fetch).
pub async fn mark_paid(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = 'Paid', paid_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status != 'Paid'
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
