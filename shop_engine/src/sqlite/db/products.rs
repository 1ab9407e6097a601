use shop_common::Money;
use sqlx::SqliteConnection;

use crate::db_types::Product;

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Inserts a catalog product. Catalog CRUD is an external collaborator; this exists for seeding and tests.
pub async fn insert_product(
    name: &str,
    price: Money,
    stock: i64,
    conn: &mut SqliteConnection,
) -> Result<Product, sqlx::Error> {
    let product = sqlx::query_as("INSERT INTO products (name, price, stock) VALUES ($1, $2, $3) RETURNING *")
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(conn)
        .await?;
    Ok(product)
}

/// Overwrites a product's catalog price. Order lines hold price snapshots, so this never affects an existing
/// order.
pub async fn update_price(
    product_id: i64,
    price: Money,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as(
        "UPDATE products SET price = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(price)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}
