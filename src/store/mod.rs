use std::str::FromStr;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;

pub mod reference_store;
pub mod task_store;

pub use reference_store::ReferenceStore;
pub use task_store::{TaskStore, UpdateReport};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS clients (
        client_number TEXT PRIMARY KEY,
        client_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS matters (
        matter_number TEXT PRIMARY KEY,
        client_number TEXT NOT NULL,
        matter_descr TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        task_descr TEXT NOT NULL,
        client_number TEXT NOT NULL,
        matter_number TEXT NOT NULL,
        time_billed REAL NOT NULL CHECK (time_billed >= 0),
        date TEXT
    )",
    "CREATE INDEX IF NOT EXISTS tasks_matter_number ON tasks (matter_number)",
    "CREATE INDEX IF NOT EXISTS tasks_date ON tasks (date)",
];

pub async fn connect(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    info!("Connected to task store at {}", config.database_url);
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // one connection that never recycles, otherwise the in-memory database vanishes
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite memory");
    init_schema(&pool).await.expect("schema");
    pool
}
