use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{Notice, Session, SessionStore};

struct Entry {
    session: Session,
    notice: Option<Notice>,
}

/// In-memory [`SessionStore`] used by the test suite.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            session.token.clone(),
            Entry {
                session,
                notice: None,
            },
        );
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<Session>> {
        let mut entries = self.entries.lock().await;
        match entries.get(token) {
            Some(entry) if entry.session.expires_at > OffsetDateTime::now_utc() => {
                Ok(Some(entry.session.clone()))
            }
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &str) -> anyhow::Result<()> {
        self.entries.lock().await.remove(token);
        Ok(())
    }

    async fn put_notice(&self, token: &str, notice: Notice) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(token) {
            entry.notice = Some(notice);
        }
        Ok(())
    }

    async fn take_notice(&self, token: &str) -> anyhow::Result<Option<Notice>> {
        let mut entries = self.entries.lock().await;
        Ok(entries.get_mut(token).and_then(|entry| entry.notice.take()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Role;
    use time::Duration;
    use uuid::Uuid;

    fn session(token: &str, ttl: Duration) -> Session {
        Session {
            token: token.into(),
            account_id: Uuid::new_v4(),
            role: Role::Provider,
            expires_at: OffsetDateTime::now_utc() + ttl,
        }
    }

    #[tokio::test]
    async fn get_returns_live_sessions_only() {
        let store = MemorySessionStore::new();
        store
            .insert(session("live", Duration::minutes(5)))
            .await
            .unwrap();
        store
            .insert(session("stale", Duration::minutes(-5)))
            .await
            .unwrap();

        assert!(store.get("live").await.unwrap().is_some());
        assert!(store.get("stale").await.unwrap().is_none());
        assert!(store.get("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_drops_the_session() {
        let store = MemorySessionStore::new();
        store
            .insert(session("tok", Duration::minutes(5)))
            .await
            .unwrap();
        store.remove("tok").await.unwrap();
        assert!(store.get("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn take_notice_yields_exactly_once() {
        let store = MemorySessionStore::new();
        store
            .insert(session("tok", Duration::minutes(5)))
            .await
            .unwrap();
        store
            .put_notice("tok", Notice::success("saved"))
            .await
            .unwrap();

        let first = store.take_notice("tok").await.unwrap();
        assert_eq!(first, Some(Notice::success("saved")));
        let second = store.take_notice("tok").await.unwrap();
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn put_notice_on_unknown_token_is_a_no_op() {
        let store = MemorySessionStore::new();
        store
            .put_notice("ghost", Notice::error("nope"))
            .await
            .unwrap();
        assert_eq!(store.take_notice("ghost").await.unwrap(), None);
    }
}
