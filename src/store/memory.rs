use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Account, AccountFilter, AccountStore, NewAccount, ProfileUpdate, Review, StoreError};

/// In-memory [`AccountStore`] used by the test suite. One mutex over the
/// whole map stands in for the per-record atomicity of the real backend.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.values().any(|a| a.email == new_account.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let account = Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            password_hash: new_account.password_hash,
            role: new_account.role,
            name: new_account.name,
            category: new_account.category,
            contact_info: new_account.contact_info,
            description: new_account.description,
            profile_picture_uri: new_account.profile_picture_uri,
            is_subscribed: false,
            trial_start_date: now,
            created_at: now,
            reviews: Vec::new(),
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = update.name {
            account.name = name;
        }
        if let Some(category) = update.category {
            account.category = category;
        }
        if let Some(contact_info) = update.contact_info {
            account.contact_info = contact_info;
        }
        if let Some(description) = update.description {
            account.description = description;
        }
        if let Some(profile_picture_uri) = update.profile_picture_uri {
            account.profile_picture_uri = profile_picture_uri;
        }
        Ok(account.clone())
    }

    async fn activate_subscription(&self, id: Uuid) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.is_subscribed = true;
        Ok(account.clone())
    }

    async fn find(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        let mut matched: Vec<Account> = accounts
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn append_review(&self, id: Uuid, review: Review) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.reviews.push(review);
        Ok(())
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError> {
        let accounts = self.accounts.lock().await;
        let mut categories: Vec<String> = accounts
            .values()
            .filter(|a| a.role == super::Role::Provider && !a.category.is_empty())
            .map(|a| a.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}
