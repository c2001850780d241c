//! HTTP API for diary entries.
//!
//! This module wires the entry handlers into an axum router, maps application
//! errors onto HTTP responses, and runs the server with graceful shutdown.
//!
//! # Routes
//!
//! - `GET    /api/entries/month` - entries of a civil month
//! - `GET    /api/entries` - entries of one date
//! - `GET    /api/entries/{id}` - one entry
//! - `POST   /api/entries` - create an entry
//! - `PUT    /api/entries/{id}` - partial update
//! - `DELETE /api/entries/{id}` - delete an entry
//! - `GET    /health` - liveness check
//!
//! Unmatched routes answer `404 {"error":"Not Found"}`; unhandled failures
//! answer `500 {"error":"Server Error"}` with details kept in the server log.

pub mod entries;

use crate::config::Config;
use crate::constants::{API_ENTRIES_PATH, API_HEALTH_PATH};
use crate::db::Database;
use crate::errors::{AppError, AppResult, DatabaseError};
use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(DatabaseError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            _ => {
                error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Builds the application router over the given database handle.
pub fn router(db: Database) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/entries/month", get(entries::list_by_month))
        .route(
            API_ENTRIES_PATH,
            get(entries::list_by_date).post(entries::create),
        )
        .route(
            "/api/entries/{id}",
            get(entries::get_one)
                .put(entries::update)
                .delete(entries::remove),
        )
        .route(API_HEALTH_PATH, get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(db)
}

/// Runs the API server until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails while
/// running.
pub async fn serve(config: &Config, db: Database) -> AppResult<()> {
    let app = router(db);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
