use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Notice, NoticeKind, Session, SessionStore};
use crate::store::Role;

/// Postgres-backed [`SessionStore`]. Expiry is lazy: stale rows are simply
/// never resolved and get overwritten or cleaned out of band.
#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct SessionRow {
    token: String,
    account_id: Uuid,
    role: String,
    expires_at: OffsetDateTime,
}

impl SessionRow {
    fn into_session(self) -> anyhow::Result<Session> {
        let role: Role = self.role.parse()?;
        Ok(Session {
            token: self.token,
            account_id: self.account_id,
            role,
            expires_at: self.expires_at,
        })
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, session: Session) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token, account_id, role, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&session.token)
        .bind(session.account_id)
        .bind(session.role.as_str())
        .bind(session.expires_at)
        .bind(OffsetDateTime::now_utc())
        .execute(&self.db)
        .await
        .context("insert session")?;
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, account_id, role, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > $2
            "#,
        )
        .bind(token)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(&self.db)
        .await
        .context("load session")?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn remove(&self, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .context("remove session")?;
        Ok(())
    }

    async fn put_notice(&self, token: &str, notice: Notice) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE sessions SET notice_kind = $2, notice_text = $3
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(notice.kind.as_str())
        .bind(&notice.text)
        .execute(&self.db)
        .await
        .context("store notice")?;
        Ok(())
    }

    async fn take_notice(&self, token: &str) -> anyhow::Result<Option<Notice>> {
        // Read and clear under one transaction so the notice renders once.
        let mut tx = self.db.begin().await.context("begin take_notice")?;

        let row = sqlx::query_as::<_, (Option<String>, Option<String>)>(
            r#"
            SELECT notice_kind, notice_text FROM sessions
            WHERE token = $1
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .context("read notice")?;

        let notice = match row {
            Some((Some(kind), Some(text))) => Some(Notice {
                kind: kind.parse::<NoticeKind>()?,
                text,
            }),
            _ => None,
        };

        if notice.is_some() {
            sqlx::query(
                r#"
                UPDATE sessions SET notice_kind = NULL, notice_text = NULL
                WHERE token = $1
                "#,
            )
            .bind(token)
            .execute(&mut *tx)
            .await
            .context("clear notice")?;
        }

        tx.commit().await.context("commit take_notice")?;
        Ok(notice)
    }
}
