// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP API and triage page

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use minijinja::{context, Environment};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::config::AppConfig;
use crate::store::{FileStore, Location, Verdict};
use crate::triage::remote::{DecideRequest, ErrorResponse, ImagesResponse, SuccessResponse};
use crate::SwipeError;

/// URL prefixes the working directories are served under
pub const PENDING_PREFIX: &str = "/pending";
pub const APPROVED_PREFIX: &str = "/approved";
pub const DECLINED_PREFIX: &str = "/declined";

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

/// Shared application state
pub struct AppState {
    pub store: FileStore,
    pub config: AppConfig,
    templates: Environment<'static>,
}

impl AppState {
    pub fn new(store: FileStore, config: AppConfig) -> crate::Result<Self> {
        let mut templates = Environment::new();
        templates.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { store, config, templates })
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let pending = ServeDir::new(state.store.dir_for(Location::Pending));
    let approved = ServeDir::new(state.store.dir_for(Location::Approved));
    let declined = ServeDir::new(state.store.dir_for(Location::Declined));

    Router::new()
        // Pages
        .route("/", get(index_page))
        // API endpoints
        .route("/api/images", get(api_list_images))
        .route("/api/approve", post(api_approve))
        .route("/api/decline", post(api_decline))
        // Read-only image directories
        .nest_service(PENDING_PREFIX, pending)
        .nest_service(APPROVED_PREFIX, approved)
        .nest_service(DECLINED_PREFIX, declined)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

// === Page Handlers ===

async fn index_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, (StatusCode, String)> {
    render_index(&state).map(Html).map_err(|e| {
        error!("Failed to render page: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page".to_string())
    })
}

fn render_index(state: &AppState) -> crate::Result<String> {
    let triage = &state.config.triage;
    let html = state.templates.get_template("index.html")?.render(context! {
        pending_prefix => format!("{}/", PENDING_PREFIX),
        swipe_threshold => triage.swipe_threshold,
        feedback_saturation => triage.feedback_saturation,
        poll_interval_ms => triage.poll_interval_ms,
        settle_delay_ms => triage.settle_delay_ms,
    })?;
    Ok(html)
}

// === API Handlers ===

async fn api_list_images(State(state): State<Arc<AppState>>) -> Result<Json<ImagesResponse>, ApiError> {
    match state.store.list_pending() {
        Ok(images) => Ok(Json(ImagesResponse { images })),
        Err(e) => {
            error!("Error reading images: {}", e);
            Err(error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read images"))
        }
    }
}

async fn api_approve(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<SuccessResponse>, ApiError> {
    decide(&state, &body, Verdict::Approve)
}

async fn api_decline(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<SuccessResponse>, ApiError> {
    decide(&state, &body, Verdict::Decline)
}

fn decide(state: &AppState, body: &[u8], verdict: Verdict) -> Result<Json<SuccessResponse>, ApiError> {
    // A missing or malformed body counts as a missing filename
    let request: DecideRequest = serde_json::from_slice(body).unwrap_or_default();
    let filename = request.filename.unwrap_or_default();

    match state.store.decide(&filename, verdict) {
        Ok(()) => Ok(Json(SuccessResponse { success: true })),
        Err(SwipeError::InvalidRequest(message)) => Err(error_body(StatusCode::BAD_REQUEST, &message)),
        Err(SwipeError::NotFound(_)) => Err(error_body(StatusCode::NOT_FOUND, "File not found")),
        Err(e) => {
            error!("Error moving {} ({}): {}", filename, verdict, e);
            let message = match verdict {
                Verdict::Approve => "Failed to approve image",
                Verdict::Decline => "Failed to decline image",
            };
            Err(error_body(StatusCode::INTERNAL_SERVER_ERROR, message))
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorResponse { error: message.to_string() }))
}

/// Start the web server
pub async fn start_server(config: AppConfig, store: FileStore) -> crate::Result<()> {
    let addr = format!("{}:{}", config.web.host, config.web.port);
    let state = Arc::new(AppState::new(store, config)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
