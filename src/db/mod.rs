pub mod models;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Build the connection pool without opening a connection.
///
/// Connections are established on first use, so an unreachable database does
/// not prevent the process from starting. Only a malformed URL fails here.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Run migrations on a background task. Failure is logged, never fatal.
pub fn spawn_migrations(pool: PgPool) -> JoinHandle<()> {
    tokio::spawn(async move {
        match run_migrations(&pool).await {
            Ok(()) => info!("Database ready"),
            Err(e) => error!(error = %e, "Database connection failed; continuing without it"),
        }
    })
}
