//! Caller-facing HTTP routes.
//!
//! Every error is rendered as `{"error": ...}` with the status chosen by
//! [`ApiError::status_code`], including extractor rejections.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use marzban_core::{PROJECT_NAME, VERSION};
use marzban_lifecycle::{CreateUserRequest, parse_days};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::service::{SubscriptionService, UserListing};

/// Shared state for API handlers.
#[derive(Clone)]
pub(crate) struct ApiState {
    service: Arc<SubscriptionService>,
    default_days: i64,
}

/// Query parameters for the extend endpoint.
#[derive(Deserialize)]
pub(crate) struct ExtendQuery {
    /// Renewal length; unparsable values fall back to the default.
    days: Option<String>,
}

/// Build the gateway router.
pub fn routes(service: Arc<SubscriptionService>, default_days: i64) -> Router {
    let state = ApiState {
        service,
        default_days,
    };
    Router::new()
        .route("/ping", get(handle_ping))
        .route("/users", get(handle_list).post(handle_create))
        .route("/users/{username}", delete(handle_delete))
        .route("/users/{username}/extend", post(handle_extend))
        .fallback(handle_not_found)
        .method_not_allowed_fallback(handle_method_not_allowed)
        .with_state(state)
}

async fn handle_ping() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": format!("{PROJECT_NAME} {VERSION} is running"),
    }))
}

async fn handle_extend(
    State(state): State<ApiState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ExtendQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(username) = path.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let days = parse_days(query.days.as_deref(), state.default_days)
        .map_err(|e| ApiError::InvalidInput(format!("days is out of range: {e}")))?;

    let outcome = state.service.extend(&username, days).await?;
    Ok(Json(json!({
        "message": format!(
            "subscription of {} extended by {} days",
            outcome.username, outcome.days
        ),
        "old_expire": outcome.old_expire,
        "new_expire": outcome.new_expire,
        "data": outcome.data,
    })))
}

async fn handle_create(
    State(state): State<ApiState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let created = state.service.create(request).await?;
    Ok(Json(created))
}

async fn handle_list(State(state): State<ApiState>) -> Result<Json<UserListing>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn handle_delete(
    State(state): State<ApiState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(username) = path.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let outcome = state.service.remove(&username).await?;
    Ok(Json(json!({
        "message": format!("user {} deleted", outcome.username),
        "data": outcome.data,
    })))
}

async fn handle_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

async fn handle_method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "method not allowed" })),
    )
}
