use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    session::Notice,
    state::AppState,
    store::{Review, Role},
};

use super::{
    dto::{SubmitReviewRequest, SubmitReviewResponse},
    rating::parse_rating,
};

pub fn review_routes() -> Router<AppState> {
    Router::new().route("/provider/review/:id", post(submit_review))
}

/// Open to anonymous visitors; the target must be a provider account.
/// Nothing is written until the payload validates.
#[instrument(skip(state, payload))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<SubmitReviewResponse>), AppError> {
    let visitor_name = payload.visitor_name.trim();
    if visitor_name.is_empty() {
        warn!(provider_id = %id, "review without a visitor name");
        return Err(AppError::Validation("visitor name must not be empty".into()));
    }

    let comment = payload.comment.trim();
    if comment.is_empty() {
        warn!(provider_id = %id, "review without a comment");
        return Err(AppError::Validation("comment must not be empty".into()));
    }

    let provider = state
        .store
        .find_by_id(id)
        .await?
        .filter(|account| account.role == Role::Provider)
        .ok_or(AppError::NotFound("provider"))?;

    let rating = parse_rating(payload.rating.as_ref());
    let review = Review {
        visitor_name: visitor_name.to_string(),
        rating,
        comment: comment.to_string(),
        submitted_at: OffsetDateTime::now_utc(),
    };
    state.store.append_review(provider.id, review).await?;

    info!(provider_id = %provider.id, rating, "review submitted");
    Ok((
        StatusCode::CREATED,
        Json(SubmitReviewResponse {
            notice: Notice::success("Thanks for your feedback."),
        }),
    ))
}
