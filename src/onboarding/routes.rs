//! REST endpoints the screen presenter talks to.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use super::manager::{ItemSubmission, OnboardingManager, OnboardingStatus, StepSubmission};
use super::resolver::NextScreen;
use crate::error::{Error, StoreError};

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

/// Error body for every failed request.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            Error::Flow(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.code()),
            Error::Store(StoreError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            Error::Store(StoreError::Corrupt { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_record")
            }
            Error::Store(StoreError::Migration(_)) | Error::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        (
            status,
            Json(serde_json::json!({"error": self.0.to_string(), "code": code})),
        )
            .into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// POST /api/onboarding/{user_id}/start
async fn start(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Result<Json<NextScreen>, ApiError> {
    Ok(Json(state.manager.start(&user_id).await?))
}

/// GET /api/onboarding/{user_id}/next
///
/// Where the app should land on cold start.
async fn next(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Result<Json<NextScreen>, ApiError> {
    Ok(Json(state.manager.resume(&user_id).await?))
}

/// GET /api/onboarding/{user_id}/status
async fn status(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Result<Json<OnboardingStatus>, ApiError> {
    Ok(Json(state.manager.status(&user_id).await?))
}

/// POST /api/onboarding/{user_id}/steps
async fn submit_step(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
    Json(submission): Json<StepSubmission>,
) -> Result<Json<NextScreen>, ApiError> {
    Ok(Json(state.manager.submit_step(&user_id, submission).await?))
}

/// POST /api/onboarding/{user_id}/items
async fn submit_item(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
    Json(submission): Json<ItemSubmission>,
) -> Result<Json<NextScreen>, ApiError> {
    Ok(Json(state.manager.submit_item(&user_id, submission).await?))
}

/// DELETE /api/onboarding/{user_id}
async fn reset(
    State(state): State<OnboardingRouteState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.manager.reset(&user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/onboarding/{user_id}", axum::routing::delete(reset))
        .route("/api/onboarding/{user_id}/start", post(start))
        .route("/api/onboarding/{user_id}/next", get(next))
        .route("/api/onboarding/{user_id}/status", get(status))
        .route("/api/onboarding/{user_id}/steps", post(submit_step))
        .route("/api/onboarding/{user_id}/items", post(submit_item))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
