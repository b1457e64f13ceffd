use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reviews::rating::{rating_summary, AverageRating};
use crate::store::Account;

/// Query string for `/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub category: Option<String>,
}

/// One search hit.
#[derive(Debug, Serialize)]
pub struct ProviderCard {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub profile_picture_uri: String,
    pub rating: AverageRating,
}

impl ProviderCard {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            category: account.category.clone(),
            description: account.description.clone(),
            profile_picture_uri: account.profile_picture_uri.clone(),
            rating: rating_summary(&account.reviews).average,
        }
    }
}

/// Search results plus the category options for the filter form.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ProviderCard>,
    pub categories: Vec<String>,
}
