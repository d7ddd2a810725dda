use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use activities::config::AppConfig;
use activities::database::{connection, schema};
use activities::error::StartupError;
use activities::logging;
use activities::web::router::build_router;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    logging::init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let pool = connection::create_pool(&config.database_url).await?;
    schema::ensure_schema(&pool).await?;

    let app = build_router(pool.clone(), &config.static_dir);
    let listener = bind_with_fallback(&config.host, config.port).await?;
    info!(addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server shut down");
    Ok(())
}

// One retry on the next port keeps a second dev instance from failing outright.
async fn bind_with_fallback(host: &str, port: u16) -> std::io::Result<TcpListener> {
    match TcpListener::bind((host, port)).await {
        Ok(listener) => Ok(listener),
        Err(e) => {
            let Some(fallback) = port.checked_add(1) else {
                return Err(e);
            };
            warn!(host, port, fallback, error = %e, "bind failed, trying fallback port");
            TcpListener::bind((host, fallback)).await
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
