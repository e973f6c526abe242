mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};

use common::send;
use recetario::app::build_app;
use recetario::state::AppState;

fn app() -> Router {
    build_app(AppState::in_memory())
}

fn register_payload(email: &str, username: &str) -> Value {
    json!({
        "email": email,
        "password": "secret1",
        "username": username,
    })
}

fn recipe_payload(autor: &str) -> Value {
    json!({
        "titulo": "Tortilla de patatas",
        "descripcion": "La clásica.",
        "categoria": "Plato principal",
        "dificultad": "Media",
        "tiempoPreparacion": "45 minutos",
        "autor": { "nombre": autor },
        "ingredientes": [{ "nombre": "Patatas", "cantidad": "1 kg" }],
        "instrucciones": ["Pelar, freír, cuajar"],
        "porciones": "4",
    })
}

async fn register(app: &Router, email: &str, username: &str) -> String {
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/register",
        Some(register_payload(email, username)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_recipe(app: &Router, autor: &str) -> String {
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/recipes",
        Some(recipe_payload(autor)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_returns_created_record() {
    let app = app();
    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/register",
        Some(register_payload("ana@example.com", "ana")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());
    assert_eq!(body["email"], json!("ana@example.com"));
    assert_eq!(body["username"], json!("ana"));
    assert_eq!(body["avatar"], Value::Null);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = app();
    register(&app, "ana@example.com", "ana").await;

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/register",
        Some(register_payload("ana@example.com", "otra")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("El email ya está registrado."));

    // No second record was created.
    let (_, users) = send(app, "GET", "/api/auth/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = app();
    register(&app, "ana@example.com", "ana").await;

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        Some(register_payload("otra@example.com", "ana")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("El nombre de usuario ya está en uso."));
}

#[tokio::test]
async fn register_reports_field_errors() {
    let (status, body) = send(
        app(),
        "POST",
        "/api/auth/register",
        Some(json!({ "email": "nope", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<_> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert_eq!(fields, vec!["email", "password", "username"]);
}

#[tokio::test]
async fn login_matches_exact_credentials() {
    let app = app();
    register(&app, "ana@example.com", "ana").await;

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "ana@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], json!("ana"));

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        Some(json!({ "email": "ana@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Credenciales inválidas"));
}

#[tokio::test]
async fn login_without_fields_is_unauthorized() {
    let (status, _) = send(app(), "POST", "/api/auth/login", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_username_change_propagates_to_recipes() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;
    create_recipe(&app, "ana").await;
    create_recipe(&app, "ana").await;
    let foreign = create_recipe(&app, "luis").await;

    let (status, body) = send(
        app.clone(),
        "PUT",
        &format!("/api/auth/profile/{ana}"),
        Some(json!({ "username": "ana2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        json!("Perfil y recetas actualizados correctamente")
    );
    assert_eq!(body["username"], json!("ana2"));

    let (_, recipes) = send(app.clone(), "GET", "/api/recipes", None).await;
    for recipe in recipes.as_array().unwrap() {
        let expected = if recipe["id"] == json!(foreign.as_str()) {
            "luis"
        } else {
            "ana2"
        };
        assert_eq!(recipe["autor"]["nombre"], json!(expected));
    }

    let (_, users) = send(app, "GET", "/api/auth/users", None).await;
    assert_eq!(users[0]["username"], json!("ana2"));
}

#[tokio::test]
async fn released_username_still_blocks_other_users() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;
    let luis = register(&app, "luis@example.com", "luis").await;

    let (status, _) = send(
        app.clone(),
        "PUT",
        &format!("/api/auth/profile/{ana}"),
        Some(json!({ "username": "ana2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "PUT",
        &format!("/api/auth/profile/{luis}"),
        Some(json!({ "username": "ana2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("El nombre de usuario ya está ocupado.")
    );
}

#[tokio::test]
async fn avatar_only_update_syncs_avatar_and_keeps_names() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;
    let recipe = create_recipe(&app, "ana").await;

    let (status, _) = send(
        app.clone(),
        "PUT",
        &format!("/api/auth/profile/{ana}"),
        Some(json!({ "avatar": "https://cdn.example.com/ana.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stored) = send(app, "GET", &format!("/api/recipes/{recipe}"), None).await;
    assert_eq!(stored["autor"]["nombre"], json!("ana"));
    assert_eq!(
        stored["autor"]["avatar"],
        json!("https://cdn.example.com/ana.png")
    );
}

#[tokio::test]
async fn empty_profile_update_is_a_noop() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;

    let (status, body) = send(
        app.clone(),
        "PUT",
        &format!("/api/auth/profile/{ana}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Nada que actualizar"));

    let (_, users) = send(app, "GET", "/api/auth/users", None).await;
    assert_eq!(users[0]["username"], json!("ana"));
    assert_eq!(users[0]["avatar"], Value::Null);
}

#[tokio::test]
async fn profile_update_unknown_user_is_404() {
    let (status, body) = send(
        app(),
        "PUT",
        "/api/auth/profile/ghost",
        Some(json!({ "username": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Usuario no encontrado"));
}

#[tokio::test]
async fn profile_update_rejects_bad_fields() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;

    let (status, body) = send(
        app,
        "PUT",
        &format!("/api/auth/profile/{ana}"),
        Some(json!({ "username": "", "avatar": "not-a-url" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_user_cascades_to_authored_recipes() {
    let app = app();
    let ana = register(&app, "ana@example.com", "ana").await;
    create_recipe(&app, "ana").await;
    let foreign = create_recipe(&app, "luis").await;

    let (status, body) = send(
        app.clone(),
        "DELETE",
        &format!("/api/auth/users/{ana}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Usuario y sus recetas eliminados"));

    let (_, recipes) = send(app.clone(), "GET", "/api/recipes", None).await;
    let remaining = recipes.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], json!(foreign.as_str()));

    let (_, users) = send(app, "GET", "/api/auth/users", None).await;
    assert!(users.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_user_reports_success() {
    let (status, body) = send(app(), "DELETE", "/api/auth/users/ghost", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Usuario y sus recetas eliminados"));
}
