use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::CartLine, shop_objects::CartLineView};

/// Adds `quantity` to the (user, product) cart line, creating the line if it does not exist. The increment is a
/// single upsert statement, so two concurrent adds for the same product serialize in the database and neither
/// increment is lost.
pub async fn upsert_cart_item(
    user_id: i64,
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<CartLine, sqlx::Error> {
    let line: CartLine = sqlx::query_as(
        r#"
            INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + excluded.quantity, updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .fetch_one(conn)
    .await?;
    debug!("🛒️ Cart line #{} for user #{user_id} now has quantity {}", line.id, line.quantity);
    Ok(line)
}

pub async fn fetch_cart_line(line_id: i64, conn: &mut SqliteConnection) -> Result<Option<CartLine>, sqlx::Error> {
    let line = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1").bind(line_id).fetch_optional(conn).await?;
    Ok(line)
}

/// Overwrites the quantity on a cart line. Ownership must have been asserted by the caller.
pub async fn set_quantity(
    line_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartLine>, sqlx::Error> {
    let line = sqlx::query_as(
        "UPDATE cart_items SET quantity = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(quantity)
    .bind(line_id)
    .fetch_optional(conn)
    .await?;
    Ok(line)
}

pub async fn delete_cart_line(line_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(line_id).execute(conn).await?;
    Ok(res.rows_affected())
}

/// The user's cart lines joined with live product data, ordered by line id. Each line's price is the current
/// catalog price.
pub async fn cart_lines_with_products(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<CartLineView>, sqlx::Error> {
    let lines = sqlx::query_as(
        r#"
            SELECT
                cart_items.id as id,
                cart_items.product_id as product_id,
                products.name as product_name,
                cart_items.quantity as quantity,
                products.price as unit_price
            FROM cart_items JOIN products ON cart_items.product_id = products.id
            WHERE cart_items.user_id = $1
            ORDER BY cart_items.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
}

/// The number of raw cart lines for the user, join-independent. Compared against the joined view to detect a
/// line whose product can no longer be resolved.
pub async fn count_cart_lines(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM cart_items WHERE user_id = $1").bind(user_id).fetch_one(conn).await?;
    Ok(count)
}

pub async fn clear_cart(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    Ok(res.rows_affected())
}
