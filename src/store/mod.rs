use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Account role. Everything except `Provider` is a plain visitor account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Provider,
    Seeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Seeker => "seeker",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(Role::Provider),
            // older records used "user" for non-provider accounts
            "seeker" | "user" => Ok(Role::Seeker),
            other => Err(anyhow::anyhow!("unknown role: {other}")),
        }
    }
}

/// One visitor-submitted review. A rating of 0 marks an inquiry, which is
/// kept in the sequence but excluded from rating averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub visitor_name: String,
    pub rating: i16,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

/// Account record with its review sequence hydrated.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub category: String,
    pub contact_info: String,
    pub description: String,
    pub profile_picture_uri: String,
    pub is_subscribed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub trial_start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub reviews: Vec<Review>,
}

/// Input for account creation. The store assigns the id and stamps
/// `trial_start_date`/`created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub category: String,
    pub contact_info: String,
    pub description: String,
    pub profile_picture_uri: String,
}

/// Partial profile update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    pub profile_picture_uri: Option<String>,
}

/// Filter for [`AccountStore::find`]. All present clauses combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<Role>,
    pub subscribed: Option<bool>,
    /// Case-insensitive category match.
    pub category: Option<String>,
    /// Case-insensitive substring match against name OR description.
    pub text: Option<String>,
}

impl AccountFilter {
    /// Reference matching semantics; the Postgres backend mirrors this in SQL.
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(role) = self.role {
            if account.role != role {
                return false;
            }
        }
        if let Some(subscribed) = self.subscribed {
            if account.is_subscribed != subscribed {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if account.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_name = account.name.to_lowercase().contains(&needle);
            let in_description = account.description.to_lowercase().contains(&needle);
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("account not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The single account collection every business component reads and writes.
///
/// Backed by Postgres in production and by an in-memory map in tests.
/// Operations are atomic per record; review appends must never be lost
/// under concurrent submission.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::DuplicateEmail`]
    /// without persisting anything when the email is already taken.
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Apply a partial profile update and return the updated account.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
        -> Result<Account, StoreError>;

    /// Flip `is_subscribed` to true. Idempotent.
    async fn activate_subscription(&self, id: Uuid) -> Result<Account, StoreError>;

    /// All accounts matching `filter`, ordered by creation time.
    async fn find(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError>;

    /// Atomically append one review to the account's sequence.
    async fn append_review(&self, id: Uuid, review: Review) -> Result<(), StoreError>;

    /// Distinct non-empty `category` values among provider accounts.
    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError>;
}
