mod dto;
mod handlers;

use crate::state::AppState;
use axum::Router;

pub(crate) const RECIPES_COLLECTION: &str = "recipes";

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
