use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    error::AppResult,
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod friends;
pub mod movies;
pub mod preferences;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(movies::routes())
        .merge(auth::routes())
        .merge(preferences::routes())
        .merge(friends::routes())
        .merge(admin::routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Health check endpoint; also confirms the database answers
async fn health_check(State(state): State<AppState>) -> AppResult<(StatusCode, Json<Value>)> {
    sqlx::query("SELECT 1").execute(&state.db_pool).await?;
    Ok((StatusCode::OK, Json(json!({ "status": "healthy" }))))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Warning,
}

/// User-facing outcome message returned by state-changing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashCategory::Warning, message)
    }
}

impl IntoResponse for Flash {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
