use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod rating;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::review_routes())
}
