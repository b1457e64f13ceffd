use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    session::{extract::resolve_own_account, CurrentUser, Notice},
    state::AppState,
    store::StoreError,
};

use super::dto::{SubscribePage, SubscriptionStatus};

pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/subscribe", get(subscribe_page))
        .route("/subscribe/activate", post(activate))
}

#[instrument(skip(state))]
pub async fn subscribe_page(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<SubscribePage>, AppError> {
    let account = resolve_own_account(&state, &session).await?;
    let notice = state.sessions.take_notice(&session.token).await?;

    Ok(Json(SubscribePage {
        subscription: SubscriptionStatus::of(&account, OffsetDateTime::now_utc()),
        notice,
    }))
}

/// Flips the paid flag. Safe to call again once subscribed.
#[instrument(skip(state))]
pub async fn activate(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<(StatusCode, HeaderMap, Json<SubscriptionStatus>), AppError> {
    let account = match state.store.activate_subscription(session.account_id).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            warn!(account_id = %session.account_id, "session points at a missing account");
            state.sessions.remove(&session.token).await?;
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    state
        .sessions
        .put_notice(&session.token, Notice::success("Subscription active."))
        .await?;

    info!(account_id = %account.id, "subscription activated");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_static("/provider/profile"),
    );
    Ok((
        StatusCode::OK,
        headers,
        Json(SubscriptionStatus::of(&account, OffsetDateTime::now_utc())),
    ))
}
