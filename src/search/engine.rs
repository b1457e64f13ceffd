use std::collections::BTreeSet;

use crate::reviews::rating::rating_summary;
use crate::store::{Account, AccountFilter, Role};

/// Sentinel dropdown option meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All Categories";

/// Build the account filter for a visitor search. Blank inputs and the
/// sentinel category fall away; results are always subscribed providers.
pub fn build_filter(query: Option<&str>, category: Option<&str>) -> AccountFilter {
    let text = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
        .map(str::to_string);

    AccountFilter {
        role: Some(Role::Provider),
        subscribed: Some(true),
        category,
        text,
    }
}

/// Order results best-rated first. Rated providers come before unrated
/// ones; ties keep the store's creation order.
pub fn rank_by_rating(accounts: Vec<Account>) -> Vec<Account> {
    let mut keyed: Vec<(Option<f64>, Account)> = accounts
        .into_iter()
        .map(|account| (rating_summary(&account.reviews).average.as_f64(), account))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    keyed.into_iter().map(|(_, account)| account).collect()
}

/// Category dropdown contents: the configured base list merged with every
/// category providers actually registered under, sentinel first. A stored
/// value colliding with the sentinel is dropped rather than doubled.
pub fn category_options(base: &[String], stored: &[String]) -> Vec<String> {
    let mut merged: BTreeSet<String> = base.iter().cloned().collect();
    merged.extend(stored.iter().cloned());
    merged.retain(|c| !c.eq_ignore_ascii_case(ALL_CATEGORIES));

    let mut options = Vec::with_capacity(merged.len() + 1);
    options.push(ALL_CATEGORIES.to_string());
    options.extend(merged);
    options
}
