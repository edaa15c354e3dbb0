use sea_orm::{Database, DatabaseConnection};
use tokio::sync::OnceCell;

use crate::config::APP_CONFIG;

pub static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

pub async fn get_database_connection() -> &'static DatabaseConnection {
    DATABASE_CONNECTION
        .get_or_init(|| async {
            Database::connect(&APP_CONFIG.database_url)
                .await
                .expect("Failed to connect to database")
        })
        .await
}
