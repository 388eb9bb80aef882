//! HTTP front end: `POST /solve`, `GET /`, `GET /health`, `GET /rules`, `GET /examples`.
/// handlers and the router
pub mod routes;

use crate::config::AppConfig;
use crate::solver::integral_solver::IntegralSolver;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds `host:port` from the config and serves until Ctrl-C.
pub async fn run(config: &AppConfig, solver: IntegralSolver) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    info!("Starting server on {}", listener.local_addr()?);
    let app = routes::router(Arc::new(solver));
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(err) => {
            // without a signal handler the server just runs until killed
            error!("failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
