mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};

use common::send;
use recetario::products::{router, ProductsState};

fn app() -> Router {
    router(ProductsState::seeded())
}

#[tokio::test]
async fn root_greets() {
    let (status, body) = send(app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("API de Productos v1.0"));
}

#[tokio::test]
async fn seeded_catalog_lists_three_products() {
    let (status, body) = send(app(), "GET", "/productos", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    let ids: Vec<_> = items.iter().map(|p| p["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn create_assigns_next_id_and_coerces_string_precio() {
    let app = app();
    let (status, body) = send(
        app.clone(),
        "POST",
        "/productos",
        Some(json!({ "nombre": "Monitor", "precio": "250.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 4, "nombre": "Monitor", "precio": 250.5 }));

    let (_, all) = send(app, "GET", "/productos", None).await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let (status, body) = send(
        app(),
        "POST",
        "/productos",
        Some(json!({ "id": 99, "nombre": "Webcam", "precio": 80 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(4));
}

#[tokio::test]
async fn create_rejects_non_numeric_precio() {
    let (status, body) = send(
        app(),
        "POST",
        "/productos",
        Some(json!({ "nombre": "Webcam", "precio": "gratis" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mensaje"], json!("El precio debe ser un número."));
}

#[tokio::test]
async fn get_by_id_and_missing_id() {
    let app = app();
    let (status, body) = send(app.clone(), "GET", "/productos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], json!("Laptop Dell XPS 15"));

    let (status, body) = send(app, "GET", "/productos/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mensaje"], json!("Producto no encontrado"));
}

#[tokio::test]
async fn update_overwrites_existing_product_only() {
    let app = app();
    let (status, body) = send(
        app.clone(),
        "PUT",
        "/productos/2",
        Some(json!({ "nombre": "Teclado", "precio": "120" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["precio"], json!(120.0));

    let (status, _) = send(
        app,
        "PUT",
        "/productos/77",
        Some(json!({ "nombre": "Nada", "precio": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_204_and_removes_the_id() {
    let app = app();
    let (status, body) = send(app.clone(), "DELETE", "/productos/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, all) = send(app.clone(), "GET", "/productos", None).await;
    let ids: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (status, _) = send(app, "DELETE", "/productos/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
