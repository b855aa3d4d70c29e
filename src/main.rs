use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use neolight_service::{
    api,
    config::Config,
    db,
    store::PgNeolightStore,
    weather::{WeatherClient, WeatherSync},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env; env vars may also be set externally
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neolight_service=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let addr = format!("{}:{}", config.server_bind, config.port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    // The pool connects lazily and migrations run in the background, so the
    // listener is up even while the database is unreachable; requests fail
    // with 500 until it answers.
    let pool = db::create_pool(&config.database_url, config.db_max_connections)?;
    db::spawn_migrations(pool.clone());

    let store = Arc::new(PgNeolightStore::new(pool));

    match &config.weather {
        Some(weather) => {
            let sync = WeatherSync::new(store.clone(), WeatherClient::new(weather), weather);
            tokio::spawn(sync.run());
        }
        None => info!("OPENWEATHER_API_KEY not set; weather sync disabled"),
    }

    info!(url = %config.public_url(local_addr), "Server running");
    info!(url = %format!("http://localhost:{}", local_addr.port()), "Local");

    axum::serve(listener, api::router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
