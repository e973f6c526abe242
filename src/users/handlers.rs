use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{LoginRequest, ProfileChanges, RegisterRequest};
use super::services::{self, ProfileUpdate};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/profile/:id", put(update_profile))
}

#[instrument(skip(state, body))]
async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req = RegisterRequest::from_value(&body).map_err(|errors| {
        warn!(fields = errors.len(), "register payload rejected");
        ApiError::Validation(errors)
    })?;
    let created = services::register(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, body))]
async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let req = LoginRequest::from_value(&body)
        .ok_or_else(|| ApiError::Auth("Credenciales inválidas".into()))?;
    let user = services::login(state.store.as_ref(), req).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let users = services::list(state.store.as_ref()).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    services::delete_with_recipes(state.store.as_ref(), &id).await?;
    Ok(Json(json!({ "message": "Usuario y sus recetas eliminados" })))
}

#[instrument(skip(state, body))]
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let changes = ProfileChanges::from_value(&body).map_err(|errors| {
        warn!(user_id = %id, fields = errors.len(), "profile payload rejected");
        ApiError::Validation(errors)
    })?;

    match services::update_profile(state.store.as_ref(), &id, changes).await? {
        ProfileUpdate::Nothing => Ok(Json(json!({ "message": "Nada que actualizar" }))),
        ProfileUpdate::Applied { changes, .. } => {
            let mut response = json!({
                "message": "Perfil y recetas actualizados correctamente",
                "id": id,
            });
            if let Some(username) = changes.username {
                response["username"] = json!(username);
            }
            if let Some(avatar) = changes.avatar {
                response["avatar"] = json!(avatar);
            }
            Ok(Json(response))
        }
    }
}
