use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    reviews::rating::rating_summary,
    session::{extract::resolve_own_account, CurrentUser, Notice},
    state::AppState,
    store::{ProfileUpdate, Role, StoreError},
    subscription::SubscriptionStatus,
};

use super::dto::{ProfileResponse, PublicProfile, UpdateProfileRequest};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/provider/profile",
            get(own_profile).post(update_profile),
        )
        .route("/provider/view/:id", get(public_profile))
}

#[instrument(skip(state))]
pub async fn own_profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let account = resolve_own_account(&state, &session).await?;
    let notice = state.sessions.take_notice(&session.token).await?;

    let now = OffsetDateTime::now_utc();
    Ok(Json(ProfileResponse {
        subscription: SubscriptionStatus::of(&account, now),
        rating: rating_summary(&account.reviews),
        account,
        notice,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            warn!(account_id = %session.account_id, "rejected empty display name");
            return Err(AppError::Validation("name must not be empty".into()));
        }
    }

    let update = ProfileUpdate {
        name: payload.name.map(|v| v.trim().to_string()),
        category: payload.category.map(|v| v.trim().to_string()),
        contact_info: payload.contact_info,
        description: payload.description,
        profile_picture_uri: payload.profile_picture_uri.map(|v| v.trim().to_string()),
    };

    let account = match state.store.update_profile(session.account_id, update).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            warn!(account_id = %session.account_id, "session points at a missing account");
            state.sessions.remove(&session.token).await?;
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    info!(account_id = %account.id, "profile updated");

    let now = OffsetDateTime::now_utc();
    Ok(Json(ProfileResponse {
        subscription: SubscriptionStatus::of(&account, now),
        rating: rating_summary(&account.reviews),
        account,
        notice: Some(Notice::success("Profile saved.")),
    }))
}

/// Anyone may view; only subscribed providers are published.
#[instrument(skip(state))]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let account = state
        .store
        .find_by_id(id)
        .await?
        .filter(|account| account.role == Role::Provider && account.is_subscribed)
        .ok_or(AppError::NotFound("provider"))?;

    Ok(Json(PublicProfile::from_account(account)))
}
