use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::error::ScrapeError;
use crate::extract::Scraper;
use crate::models::ExtractRequest;
use crate::persist::{save_images, SaveConfig};
use crate::resolve::resolve;

// ── State & router ───────────────────────────────────────────────────────────

pub struct AppState {
    pub scraper: Scraper,
    pub save: SaveConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    // The share pages are public; so is this wrapper.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/api/extract", post(extract_endpoint))
        .layer(cors)
        .with_state(state)
}

pub async fn run(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    run_with_listener(listener, state).await
}

/// Serve from a pre-bound listener; split out so tests can bind port 0.
pub async fn run_with_listener(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
) -> std::io::Result<()> {
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Redbook note extraction API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn extract_endpoint(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    let url = match resolve(&req.url) {
        Some(url) => url,
        None => return error_response(&ScrapeError::NoLink),
    };

    let note = match state.scraper.fetch_note(&url).await {
        Ok(note) => note,
        Err(e) => return error_response(&e),
    };

    // Nothing to download → skip persistence entirely, no directory created.
    if !req.save_images || note.images.is_empty() {
        return (StatusCode::OK, Json(note)).into_response();
    }

    match save_images(&state.scraper, &note, &state.save).await {
        Ok(saved) => (StatusCode::OK, Json(saved.note)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &ScrapeError) -> Response {
    let status = match err {
        ScrapeError::NoLink => StatusCode::BAD_REQUEST,
        ScrapeError::Fetch(_) | ScrapeError::Status(_) => StatusCode::BAD_REQUEST,
        ScrapeError::Parse(_) | ScrapeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"detail": err.to_string()}))).into_response()
}
