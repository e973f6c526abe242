use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::catalog::{ProductCatalog, Producto};

#[derive(Clone)]
pub struct ProductsState {
    catalog: Arc<Mutex<ProductCatalog>>,
}

impl ProductsState {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(ProductCatalog::seeded())
    }
}

pub fn router(state: ProductsState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/productos", get(list_productos).post(create_producto))
        .route(
            "/productos/:id",
            get(get_producto).put(update_producto).delete(delete_producto),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ProductoInput {
    nombre: String,
    precio: Value,
}

/// The original coerced `precio` with `parseFloat`; numbers and numeric
/// strings are accepted, anything else is a 400 instead of a NaN.
fn coerce_precio(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

type MensajeError = (StatusCode, Json<Value>);

fn not_found() -> MensajeError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "mensaje": "Producto no encontrado" })),
    )
}

fn bad_precio() -> MensajeError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "mensaje": "El precio debe ser un número." })),
    )
}

async fn root() -> &'static str {
    "API de Productos v1.0"
}

#[instrument(skip(state))]
async fn list_productos(State(state): State<ProductsState>) -> Json<Vec<Producto>> {
    Json(state.catalog.lock().list())
}

#[instrument(skip(state))]
async fn get_producto(
    State(state): State<ProductsState>,
    Path(id): Path<u64>,
) -> Result<Json<Producto>, MensajeError> {
    state.catalog.lock().get(id).map(Json).ok_or_else(not_found)
}

#[instrument(skip(state, input))]
async fn create_producto(
    State(state): State<ProductsState>,
    Json(input): Json<ProductoInput>,
) -> Result<(StatusCode, Json<Producto>), MensajeError> {
    let precio = coerce_precio(&input.precio).ok_or_else(bad_precio)?;
    let producto = state.catalog.lock().create(input.nombre, precio);
    Ok((StatusCode::CREATED, Json(producto)))
}

#[instrument(skip(state, input))]
async fn update_producto(
    State(state): State<ProductsState>,
    Path(id): Path<u64>,
    Json(input): Json<ProductoInput>,
) -> Result<Json<Producto>, MensajeError> {
    let precio = coerce_precio(&input.precio).ok_or_else(bad_precio)?;
    state
        .catalog
        .lock()
        .update(id, input.nombre, precio)
        .map(Json)
        .ok_or_else(not_found)
}

#[instrument(skip(state))]
async fn delete_producto(
    State(state): State<ProductsState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, MensajeError> {
    if state.catalog.lock().remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
