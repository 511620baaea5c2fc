use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::AppConfig;

pub type DbPool = PgPool;
pub type OrmConn = DatabaseConnection;

/// Bounded pool: fixed maximum, no minimum, idle connections released after the timeout.
pub async fn create_pool(config: &AppConfig) -> Result<DbPool> {
    let pool = pool_options(config).connect(&config.database_url).await?;
    Ok(pool)
}

/// Same pool settings, but no connection is opened until the first query.
pub fn create_lazy_pool(config: &AppConfig) -> Result<DbPool> {
    let pool = pool_options(config).connect_lazy(&config.database_url)?;
    Ok(pool)
}

fn pool_options(config: &AppConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(0)
        .idle_timeout(Some(config.db_idle_timeout))
}

/// SeaORM connection sharing the sqlx pool.
pub fn create_orm_conn(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

/// Creates the accounts, listings and favorites tables if they are absent.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
