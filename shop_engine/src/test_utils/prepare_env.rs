use log::*;
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};

use crate::SqliteDatabase;

/// Drops any leftover database at `url`, recreates it and brings the storefront schema up to date. Call this
/// once at the top of each test, with a url from [`random_db_path`] so parallel tests never share a store.
pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("🗃️ No leftover database to drop at {url}. {e}");
    }
    Sqlite::create_database(url).await.expect("Error creating test database");
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error connecting to test database");
    migrate!("./src/sqlite/db/migrations").run(db.pool()).await.expect("Error migrating test database");
    debug!("🗃️ Test database ready at {url}");
}

/// A unique sqlite url under the workspace `data/` directory.
pub fn random_db_path() -> String {
    format!("sqlite://../data/shop_test_{}.sqlite3", rand::random::<u32>())
}
