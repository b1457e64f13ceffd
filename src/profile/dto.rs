use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reviews::rating::{rating_summary, RatingSummary};
use crate::session::Notice;
use crate::store::{Account, Review};
use crate::subscription::SubscriptionStatus;

/// Owner dashboard payload.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub account: Account,
    pub subscription: SubscriptionStatus,
    pub rating: RatingSummary,
    pub notice: Option<Notice>,
}

/// Partial profile edit; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    pub profile_picture_uri: Option<String>,
}

/// What anonymous visitors see. No email, no subscription internals.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub contact_info: String,
    pub description: String,
    pub profile_picture_uri: String,
    pub rating: RatingSummary,
    pub reviews: Vec<Review>,
}

impl PublicProfile {
    pub fn from_account(account: Account) -> Self {
        let rating = rating_summary(&account.reviews);
        Self {
            id: account.id,
            name: account.name,
            category: account.category,
            contact_info: account.contact_info,
            description: account.description,
            profile_picture_uri: account.profile_picture_uri,
            rating,
            reviews: account.reviews,
        }
    }
}
