use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::{entity::Employee, storage::EntityStore};

mod handlers;
mod models;

pub use models::{CountParams, ErrorResponse, HealthResponse, ParamsError};

use handlers::{count_employees, health, not_found};

#[derive(Clone)]
pub struct AppState<S> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
}

impl<S> AppState<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            started_at: std::time::SystemTime::now(),
        }
    }
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: EntityStore<Employee> + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health::<S>))
        .route("/employees/count", get(count_employees::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S>(
    addr: SocketAddr,
    storage: S,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()>
where
    S: EntityStore<Employee> + Clone + Send + Sync + 'static,
{
    log::info!("🌐 REST service on http://{}", addr);

    let app = router(AppState::new(storage));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
