pub mod queries;
pub mod transfer;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

use crate::settings::DatabaseSettings;

/// Failure of a single store operation.
///
/// Handlers decide which HTTP status each kind maps to, so the variants only
/// describe what went wrong at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub async fn establish_connection(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options =
        SqliteConnectOptions::from_str(&settings.url)?.create_if_missing(settings.create_if_missing);
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
