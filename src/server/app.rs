use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{error::ApiError, routes};
use crate::db;
use crate::settings::{DatabaseSettings, Settings};

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Connects to the store described by `settings`, applies migrations and
/// returns the composed router.
pub async fn create_app(settings: &DatabaseSettings) -> anyhow::Result<Router> {
    let pool = db::establish_connection(settings)
        .await
        .with_context(|| format!("Failed to connect to {}", settings.url))?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(router(AppState::new(pool)))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        })
        // known path, unsupported method
        .method_not_allowed_fallback(|method: Method| async move {
            tracing::info!("No {method} handler");
            ApiError::NotFound
        })
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let app = create_app(&settings.database).await?;
    let addr = settings.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received ctrl-c, shutting down");
}

async fn metrics() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    encoder.encode(&metrics, &mut buf).map_err(|err| {
        tracing::error!("Failed to encode metrics: {err}");
        ApiError::Unprocessable
    })?;
    let content_type = HeaderValue::from_str(encoder.format_type()).map_err(|err| {
        tracing::error!("Invalid metrics content type: {err}");
        ApiError::Unprocessable
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], buf).into_response())
}
