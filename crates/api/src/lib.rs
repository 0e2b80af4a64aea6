//! Climate API Server
//!
//! Read-only REST API over weather station observations.

use anyhow::Context;
use axum::{routing::get, Json, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

use climate_storage::Repository;
use crate::config::{LoggingSettings, Settings, WindowSettings};
use crate::error::AppError;
use crate::service::WeatherService;

/// Result type for JSON handlers
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Application state shared across handlers
pub struct AppState {
    pub service: WeatherService,
}

impl AppState {
    pub fn new(repository: Repository, windows: WindowSettings) -> Self {
        Self {
            service: WeatherService::new(repository, windows),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::welcome))
        .route(
            "/api/v1.0/precipitation",
            get(routes::observations::get_precipitation),
        )
        .route("/api/v1.0/stations", get(routes::stations::get_stations))
        .route("/api/v1.0/tobs", get(routes::observations::get_tobs))
        .route(
            "/api/v1.0/calc_temps/:start",
            get(routes::temperature::get_summary_since),
        )
        .route(
            "/api/v1.0/calc_temps/:start/:end",
            get(routes::temperature::get_summary_between),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .context("Invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    if settings.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()?;
    }
    Ok(())
}

/// Serve on `listener` until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Open the dataset, serve until Ctrl-C, then release the connection pool
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let repository = Repository::open(
        &settings.database.path,
        &settings.database.pool_settings(),
    )
    .await
    .context("Failed to open climate dataset")?;

    let state = Arc::new(AppState::new(repository.clone(), settings.windows.clone()));

    let listener = match TcpListener::bind(&settings.server.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            repository.close().await;
            return Err(e)
                .with_context(|| format!("Failed to bind {}", settings.server.bind_addr));
        }
    };
    info!("Starting API server on {}", settings.server.bind_addr);

    let result = serve(listener, state, shutdown_signal()).await;
    repository.close().await;
    info!("API server stopped");
    result
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
