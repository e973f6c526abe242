mod dto;
mod handlers;
mod services;

use crate::state::AppState;
use axum::Router;

pub(crate) const USERS_COLLECTION: &str = "users";

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::directory_routes())
}
