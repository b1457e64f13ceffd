use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use super::{cookie_value, Session};
use crate::{error::AppError, state::AppState, store::Account};

/// Extracts and validates the session cookie, returning the live session.
pub struct CurrentUser(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .headers
            .get(header::COOKIE)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token =
            cookie_value(cookies, &state.config.session.cookie_name).ok_or(AppError::Unauthorized)?;

        // Expired sessions come back as None
        let session = state
            .sessions
            .get(token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(session))
    }
}

/// Loads the account behind a session. A session whose account no longer
/// exists is corrupted state: drop it and ask the caller to sign in again.
pub async fn resolve_own_account(
    state: &AppState,
    session: &Session,
) -> Result<Account, AppError> {
    match state.store.find_by_id(session.account_id).await? {
        Some(account) => Ok(account),
        None => {
            warn!(account_id = %session.account_id, "session points at a missing account");
            state.sessions.remove(&session.token).await?;
            Err(AppError::Unauthorized)
        }
    }
}
