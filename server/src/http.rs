use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_common::api::{
    ErrorResponse, HealthResponse, SavedResponse, GENERIC_ERROR, MISSING_FIELDS_ERROR,
    SAVE_FAILED_ERROR,
};
use folio_common::message::Submission;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::store::{MessageStore, StoreError};

pub struct AppState {
    pub config: ServerConfig,
    pub store: MessageStore,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let store = config.open_store();
        Self { config, store }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failures while handling a request. Clients only ever see the fixed
/// bodies from `folio_common::api`; the detail goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unusable request body: {0}")]
    Payload(#[from] JsonRejection),

    #[error("submission is missing name, email or message")]
    MissingFields,

    #[error("failed to save message: {0}")]
    Persist(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Payload(_) => {
                error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
            }
            ApiError::MissingFields => (StatusCode::BAD_REQUEST, MISSING_FIELDS_ERROR),
            ApiError::Persist(_) => {
                error!(error = %self, "error saving message");
                (StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED_ERROR)
            }
        };
        (status, Json(ErrorResponse::new(body))).into_response()
    }
}

/// Turns a handler panic into the generic 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(GENERIC_ERROR)),
    )
        .into_response()
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn contact_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let Json(submission) = payload?;

    if state.config.require_fields && !submission.has_required_fields() {
        return Err(ApiError::MissingFields);
    }

    let name = submission.text("name").unwrap_or_default().to_string();
    state.store.ensure_dir().await?;
    let count = state.store.append(submission).await?;
    info!(name = %name, count, "contact message saved");

    Ok(Json(SavedResponse::saved()))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(cors::Any);

    Router::new()
        .route("/api/contact", post(contact_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
