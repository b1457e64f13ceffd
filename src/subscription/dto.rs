use serde::Serialize;
use time::OffsetDateTime;

use super::policy;
use crate::session::Notice;
use crate::store::Account;

/// Subscription standing as shown on the provider dashboard.
#[derive(Debug, Serialize)]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
    pub trial_active: bool,
    pub days_left: i64,
}

impl SubscriptionStatus {
    pub fn of(account: &Account, now: OffsetDateTime) -> Self {
        let trial_active =
            policy::is_trial_active(account.is_subscribed, account.trial_start_date, now);
        let days_left = if trial_active {
            policy::days_left(account.trial_start_date, now)
        } else {
            0
        };
        Self {
            is_subscribed: account.is_subscribed,
            trial_active,
            days_left,
        }
    }
}

/// Response for the subscribe page.
#[derive(Debug, Serialize)]
pub struct SubscribePage {
    pub subscription: SubscriptionStatus,
    pub notice: Option<Notice>,
}
