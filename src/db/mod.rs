use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

pub mod stockprices;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS stockprices (
    timestamp TIMESTAMPTZ PRIMARY KEY,
    price DECIMAL NOT NULL
)";

/// Initialize the Postgres connection pool and create the table
pub async fn init_db(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    create_table(&pool).await?;

    Ok(pool)
}

/// Create the stockprices table if it does not exist yet
pub async fn create_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;
    Ok(())
}

/// Remove every row, keeping the table
pub async fn clean_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM stockprices").execute(pool).await?;
    Ok(())
}

/// Drop the stockprices table
pub async fn drop_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP TABLE IF EXISTS stockprices").execute(pool).await?;
    Ok(())
}
