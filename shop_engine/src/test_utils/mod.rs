//! Helpers for setting up throwaway databases and seed data in tests. Compiled unconditionally so that
//! downstream crates can use them from their own integration tests.
mod prepare_env;

pub use prepare_env::{prepare_test_env, random_db_path};
use shop_common::Money;

use crate::{
    db_types::{Product, User},
    SqliteDatabase,
};

pub async fn seed_user(db: &SqliteDatabase, email: &str, display_name: &str) -> User {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    crate::sqlite::db::users::insert_user(email, display_name, &mut conn).await.expect("Error seeding user")
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price: Money, stock: i64) -> Product {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    crate::sqlite::db::products::insert_product(name, price, stock, &mut conn).await.expect("Error seeding product")
}

pub async fn set_product_price(db: &SqliteDatabase, product_id: i64, price: Money) -> Product {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    crate::sqlite::db::products::update_price(product_id, price, &mut conn)
        .await
        .expect("Error updating price")
        .expect("No such product")
}
