use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, LoginResponse, NoticeResponse, PublicAccount,
            RegisterRequest, RegisterResponse,
        },
        password::{hash_password, verify_password},
    },
    error::AppError,
    session::{
        clear_session_cookie, cookie_value, new_session_token, session_cookie, Notice, Session,
    },
    state::AppState,
    store::{Account, NewAccount, Role},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
        .route("/auth/forgot-password", post(forgot_password))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<RegisterResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("invalid email address".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let name = payload.name.trim();
    if name.is_empty() {
        warn!("empty provider name");
        return Err(AppError::Validation("name must not be empty".into()));
    }

    // Ensure email is not taken; the store enforces uniqueness as well.
    if state.store.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&payload.password)?;

    let account = state
        .store
        .create(NewAccount {
            email: payload.email,
            password_hash,
            role: Role::Provider,
            name: name.to_string(),
            category: payload.category.trim().to_string(),
            contact_info: String::new(),
            description: String::new(),
            profile_picture_uri: String::new(),
        })
        .await?;

    info!(account_id = %account.id, email = %account.email, "provider registered");

    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static("/auth/login"));
    Ok((
        StatusCode::CREATED,
        headers,
        Json(RegisterResponse {
            account: PublicAccount::from(&account),
            notice: Notice::success("Registration complete. You can sign in now."),
        }),
    ))
}

/// Unknown email and wrong password both resolve to [`AppError::InvalidCredentials`].
async fn verify_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let Some(account) = state.store.find_by_email(email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &account.password_hash)? {
        warn!(email = %email, account_id = %account.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(account)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(StatusCode, HeaderMap, Json<LoginResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("invalid email address".into()));
    }

    let account = verify_credentials(&state, &payload.email, &payload.password).await?;

    let ttl = Duration::minutes(state.config.session.ttl_minutes);
    let session = Session {
        token: new_session_token(),
        account_id: account.id,
        role: account.role,
        expires_at: OffsetDateTime::now_utc() + ttl,
    };
    let cookie = session_cookie(&state.config.session.cookie_name, &session.token, ttl)?;
    state.sessions.insert(session).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);

    info!(account_id = %account.id, email = %account.email, "signed in");
    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            account: PublicAccount::from(&account),
        }),
    ))
}

/// Idempotent: succeeds with or without a live session.
#[instrument(skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, HeaderMap, Json<NoticeResponse>), AppError> {
    let cookie_name = &state.config.session.cookie_name;

    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, cookie_name))
    {
        state.sessions.remove(token).await?;
    }

    let mut out = HeaderMap::new();
    out.insert(header::SET_COOKIE, clear_session_cookie(cookie_name)?);
    Ok((
        StatusCode::OK,
        out,
        Json(NoticeResponse {
            notice: Notice::success("Signed out."),
        }),
    ))
}

/// Reset stub: acknowledges without revealing whether the address exists.
#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<NoticeResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if let Some(account) = state.store.find_by_email(&payload.email).await? {
        info!(account_id = %account.id, "password reset requested");
    }

    Ok(Json(NoticeResponse {
        notice: Notice::success("If that address is registered, reset instructions are on their way."),
    }))
}
