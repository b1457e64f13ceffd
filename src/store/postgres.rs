use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    Account, AccountFilter, AccountStore, NewAccount, ProfileUpdate, Review, Role, StoreError,
};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, role, name, category, contact_info, \
                               description, profile_picture_uri, is_subscribed, \
                               trial_start_date, created_at";

/// Postgres-backed [`AccountStore`]. Reviews live in their own table so an
/// append is a single row insert rather than a rewrite of the sequence.
#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn load_reviews(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Review>>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT account_id, visitor_name, rating, comment, submitted_at
            FROM reviews
            WHERE account_id = ANY($1)
            ORDER BY submitted_at ASC, id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await
        .context("load reviews")?;

        let mut grouped: HashMap<Uuid, Vec<Review>> = HashMap::new();
        for row in rows {
            grouped.entry(row.account_id).or_default().push(Review {
                visitor_name: row.visitor_name,
                rating: row.rating,
                comment: row.comment,
                submitted_at: row.submitted_at,
            });
        }
        Ok(grouped)
    }

    async fn hydrate(&self, row: AccountRow) -> Result<Account, StoreError> {
        let mut reviews = self.load_reviews(&[row.id]).await?;
        let reviews = reviews.remove(&row.id).unwrap_or_default();
        row.into_account(reviews)
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    name: String,
    category: String,
    contact_info: String,
    description: String,
    profile_picture_uri: String,
    is_subscribed: bool,
    trial_start_date: OffsetDateTime,
    created_at: OffsetDateTime,
}

impl AccountRow {
    fn into_account(self, reviews: Vec<Review>) -> Result<Account, StoreError> {
        let role: Role = self.role.parse().map_err(StoreError::Backend)?;
        Ok(Account {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            role,
            name: self.name,
            category: self.category,
            contact_info: self.contact_info,
            description: self.description,
            profile_picture_uri: self.profile_picture_uri,
            is_subscribed: self.is_subscribed,
            trial_start_date: self.trial_start_date,
            created_at: self.created_at,
            reviews,
        })
    }
}

#[derive(FromRow)]
struct ReviewRow {
    account_id: Uuid,
    visitor_name: String,
    rating: i16,
    comment: String,
    submitted_at: OffsetDateTime,
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        match db.code().as_deref() {
            // unique_violation: the email column
            Some("23505") => return StoreError::DuplicateEmail,
            // foreign_key_violation: review for a vanished account
            Some("23503") => return StoreError::NotFound,
            _ => {}
        }
    }
    StoreError::Backend(e.into())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (id, email, password_hash, role, name, category,
                                  contact_info, description, profile_picture_uri,
                                  is_subscribed, trial_start_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $10)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_account.email)
        .bind(&new_account.password_hash)
        .bind(new_account.role.as_str())
        .bind(&new_account.name)
        .bind(&new_account.category)
        .bind(&new_account.contact_info)
        .bind(&new_account.description)
        .bind(&new_account.profile_picture_uri)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;

        row.into_account(Vec::new())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find account by email")?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find account by id")?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET name                = COALESCE($2, name),
                category            = COALESCE($3, category),
                contact_info        = COALESCE($4, contact_info),
                description         = COALESCE($5, description),
                profile_picture_uri = COALESCE($6, profile_picture_uri)
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.category)
        .bind(update.contact_info)
        .bind(update.description)
        .bind(update.profile_picture_uri)
        .fetch_optional(&self.db)
        .await
        .context("update profile")?
        .ok_or(StoreError::NotFound)?;

        self.hydrate(row).await
    }

    async fn activate_subscription(&self, id: Uuid) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET is_subscribed = TRUE
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("activate subscription")?
        .ok_or(StoreError::NotFound)?;

        self.hydrate(row).await
    }

    async fn find(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        // Mirrors AccountFilter::matches: NULL clauses fall away and the
        // category match is case-insensitive.
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS} FROM accounts
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::boolean IS NULL OR is_subscribed = $2)
              AND ($3::text IS NULL OR lower(category) = lower($3))
              AND ($4::text IS NULL
                   OR position(lower($4) in lower(name)) > 0
                   OR position(lower($4) in lower(description)) > 0)
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(filter.subscribed)
        .bind(filter.category.as_deref())
        .bind(filter.text.as_deref())
        .fetch_all(&self.db)
        .await
        .context("find accounts")?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut reviews = self.load_reviews(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let account_reviews = reviews.remove(&row.id).unwrap_or_default();
                row.into_account(account_reviews)
            })
            .collect()
    }

    async fn append_review(&self, id: Uuid, review: Review) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, account_id, visitor_name, rating, comment, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(id)
        .bind(&review.visitor_name)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.submitted_at)
        .execute(&self.db)
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category FROM accounts
            WHERE role = $1 AND category <> ''
            ORDER BY category ASC
            "#,
        )
        .bind(Role::Provider.as_str())
        .fetch_all(&self.db)
        .await
        .context("distinct categories")?;
        Ok(categories)
    }
}
