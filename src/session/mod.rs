use async_trait::async_trait;
use axum::http::HeaderValue;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::store::Role;

pub mod extract;
pub mod memory;
pub mod postgres;

pub use extract::CurrentUser;
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;

const SESSION_TOKEN_LEN: usize = 48;

/// One-shot message surfaced on exactly one subsequent render, then cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

impl std::str::FromStr for NoticeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NoticeKind::Success),
            "error" => Ok(NoticeKind::Error),
            other => Err(anyhow::anyhow!("unknown notice kind: {other}")),
        }
    }
}

/// Server-side session resolved from the cookie token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account_id: Uuid,
    pub role: Role,
    pub expires_at: OffsetDateTime,
}

/// Session persistence seam. In-memory for tests, Postgres in production.
/// Besides the principal, sessions carry the one-shot [`Notice`] channel.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> anyhow::Result<()>;

    /// Resolve a token. Expired sessions are treated as absent.
    async fn get(&self, token: &str) -> anyhow::Result<Option<Session>>;

    async fn remove(&self, token: &str) -> anyhow::Result<()>;

    /// Attach a notice for the next render. No-op for unknown tokens.
    async fn put_notice(&self, token: &str, notice: Notice) -> anyhow::Result<()>;

    /// Pop the pending notice, clearing it; a second take yields `None`.
    async fn take_notice(&self, token: &str) -> anyhow::Result<Option<Notice>>;
}

/// Opaque random token carried by the session cookie. The cookie itself is
/// plain transport; the secret is the token, never interpreted client-side.
pub fn new_session_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn session_cookie(name: &str, token: &str, ttl: Duration) -> anyhow::Result<HeaderValue> {
    let cookie = format!(
        "{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.whole_seconds()
    );
    HeaderValue::from_str(&cookie).map_err(Into::into)
}

pub fn clear_session_cookie(name: &str) -> anyhow::Result<HeaderValue> {
    let cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    HeaderValue::from_str(&cookie).map_err(Into::into)
}

/// Pull one cookie's value out of a `Cookie:` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_long_and_distinct() {
        let a = new_session_token();
        let b = new_session_token();
        assert_eq!(a.len(), SESSION_TOKEN_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let header = "theme=dark; sid=abc123; other=x";
        assert_eq!(cookie_value(header, "sid"), Some("abc123"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn session_cookie_sets_http_only_and_max_age() {
        let value = session_cookie("sid", "tok", Duration::minutes(2)).unwrap();
        let raw = value.to_str().unwrap();
        assert!(raw.starts_with("sid=tok;"));
        assert!(raw.contains("HttpOnly"));
        assert!(raw.contains("Max-Age=120"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = clear_session_cookie("sid").unwrap();
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }
}
