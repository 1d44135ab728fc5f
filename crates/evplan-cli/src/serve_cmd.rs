use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use evplan_core::client::GENERATE_PATH;
use evplan_core::envelope::ApiResponse;
use evplan_core::plan::EventPlan;
use evplan_core::service::{PlanService, RequestError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::BadRequest(msg) => Self::bad_request(msg),
            RequestError::Internal(msg) => Self::internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "generate failed: {}", self.message);
        } else {
            tracing::debug!(status = %self.status, "rejected request: {}", self.message);
        }
        (self.status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(service: Arc<PlanService>) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(service: Arc<PlanService>, bind: &str, port: u16) -> Result<()> {
    let sources = service.chain().names().join(" -> ");
    let app = build_router(service);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("evplan serve listening on http://{addr} (sources: {sources})");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("evplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Decode a request body; blank bodies count as `{}`.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))
}

async fn generate(
    State(service): State<Arc<PlanService>>,
    body: Bytes,
) -> Result<Json<ApiResponse<EventPlan>>, AppError> {
    let value = parse_body(&body)?;
    let plan = service.handle(&value).await?;
    Ok(Json(ApiResponse::success(plan)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
