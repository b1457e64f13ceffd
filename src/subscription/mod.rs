use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod policy;

pub use dto::SubscriptionStatus;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::subscription_routes())
}
