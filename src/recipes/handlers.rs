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
use crate::store::encode;

use super::dto::{Recipe, RecipePatch};
use super::RECIPES_COLLECTION;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_recipe))
        .route("/:id", put(update_recipe).delete(delete_recipe))
}

#[instrument(skip(state))]
async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<Value>>, ApiError> {
    let docs = state.store.list(RECIPES_COLLECTION).await?;
    Ok(Json(docs.iter().map(|doc| doc.to_json()).collect()))
}

#[instrument(skip(state))]
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.store.get(RECIPES_COLLECTION, &id).await? {
        Some(doc) => Ok(Json(doc.to_json())),
        None => Err(ApiError::not_found("Receta no encontrada")),
    }
}

#[instrument(skip(state, body))]
async fn create_recipe(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let recipe = Recipe::from_value(&body).map_err(|errors| {
        warn!(fields = errors.len(), "recipe payload rejected");
        ApiError::Validation(errors)
    })?;
    let doc = state.store.add(RECIPES_COLLECTION, encode(&recipe)?).await?;
    Ok((StatusCode::CREATED, Json(doc.to_json())))
}

/// No existence pre-check: an update against a missing id surfaces as the
/// store's own error, passed through as a 500.
#[instrument(skip(state, body))]
async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let patch = RecipePatch::from_value(&body).map_err(|errors| {
        warn!(recipe_id = %id, fields = errors.len(), "recipe patch rejected");
        ApiError::Validation(errors)
    })?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "Se requiere al menos un campo para actualizar.".into(),
        ));
    }

    state
        .store
        .update(RECIPES_COLLECTION, &id, patch.to_field_updates())
        .await?;

    let mut response = serde_json::Map::new();
    response.insert(
        "message".into(),
        json!("Receta actualizada correctamente"),
    );
    response.insert("id".into(), json!(id));
    response.extend(patch.to_echo());
    Ok(Json(Value::Object(response)))
}

#[instrument(skip(state))]
async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete(RECIPES_COLLECTION, &id).await?;
    Ok(Json(json!({ "message": "Receta eliminada" })))
}
