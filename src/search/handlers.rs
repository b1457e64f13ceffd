use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{error::AppError, state::AppState};

use super::{
    dto::{ProviderCard, SearchParams, SearchResponse},
    engine::{build_filter, category_options, rank_by_rating},
};

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

/// Public directory search over subscribed providers.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let filter = build_filter(params.query.as_deref(), params.category.as_deref());
    let accounts = state.store.find(&filter).await?;
    let ranked = rank_by_rating(accounts);

    let stored = state.store.distinct_categories().await?;
    let categories = category_options(&state.config.base_categories, &stored);

    Ok(Json(SearchResponse {
        results: ranked.iter().map(ProviderCard::from_account).collect(),
        categories,
    }))
}
