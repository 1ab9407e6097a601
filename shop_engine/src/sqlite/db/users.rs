use sqlx::SqliteConnection;

use crate::db_types::User;

pub async fn fetch_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

/// Inserts a user row. User registration lives upstream of this core; this exists for seeding and tests.
pub async fn insert_user(email: &str, display_name: &str, conn: &mut SqliteConnection) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as("INSERT INTO users (email, display_name) VALUES ($1, $2) RETURNING *")
        .bind(email)
        .bind(display_name)
        .fetch_one(conn)
        .await?;
    Ok(user)
}
