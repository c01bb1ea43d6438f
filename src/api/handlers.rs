use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{NewRecommendation, Recommendation},
    services::{
        recommendations,
        scoring::{self, DownvoteOutcome},
        selection,
    },
};

use super::extract::{AppJson, AppPath};
use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Submit a new recommendation
pub async fn create_recommendation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<NewRecommendation>,
) -> AppResult<(StatusCode, Json<Recommendation>)> {
    tracing::info!(
        request_id = %request_id,
        name = %request.name,
        "Processing recommendation submission"
    );

    let recommendation = recommendations::create(state.repo(), request).await?;

    Ok((StatusCode::CREATED, Json(recommendation)))
}

/// The ten most recent recommendations
pub async fn get_recent(State(state): State<AppState>) -> AppResult<Json<Vec<Recommendation>>> {
    let recent = selection::get_recent(state.repo()).await?;
    Ok(Json(recent))
}

/// One weighted-random recommendation
pub async fn get_random(State(state): State<AppState>) -> AppResult<Json<Recommendation>> {
    let picked = selection::get_random(state.repo()).await?;
    Ok(Json(picked))
}

/// The best-scored recommendations, highest first
pub async fn get_top(
    State(state): State<AppState>,
    AppPath(amount): AppPath<String>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let amount: i64 = amount.parse().map_err(|_| {
        AppError::InvalidInput(format!("Amount must be a positive integer, got '{}'", amount))
    })?;

    let top = selection::get_top(state.repo(), amount).await?;
    Ok(Json(top))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Recommendation>> {
    let recommendation = selection::get_by_id(state.repo(), id).await?;
    Ok(Json(recommendation))
}

pub async fn upvote(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    let recommendation = scoring::upvote(state.repo(), id).await?;

    tracing::info!(
        request_id = %request_id,
        recommendation_id = id,
        score = recommendation.score,
        "Upvote recorded"
    );

    Ok(StatusCode::OK)
}

pub async fn downvote(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    let outcome = scoring::downvote(state.repo(), id).await?;

    match outcome {
        DownvoteOutcome::Scored(score) => tracing::info!(
            request_id = %request_id,
            recommendation_id = id,
            score,
            "Downvote recorded"
        ),
        DownvoteOutcome::Removed => tracing::info!(
            request_id = %request_id,
            recommendation_id = id,
            "Downvote removed recommendation"
        ),
    }

    Ok(StatusCode::OK)
}

/// Wipe every recommendation (end-to-end test support)
pub async fn reset(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    let removed = recommendations::reset(state.repo()).await?;
    tracing::info!(request_id = %request_id, removed, "Store reset");
    Ok(StatusCode::OK)
}
