//! End-to-end API integration tests
//!
//! These tests drive the full router against the in-memory store:
//! - Registration with field validation and uniqueness conflicts
//! - Login and bearer-token protected routes
//! - Admin catalog management and order status changes
//! - Customer order placement, listing and summary

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pedidos_api::api::{router, AppState};
use pedidos_api::auth::BcryptHasher;
use pedidos_api::domain::user::Role;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for oneshot
use uuid::Uuid;

const TEST_SECRET: &str = "test-secret-key-for-integration-tests";

/// Setup test application with a fresh store
fn setup() -> (Router, AppState) {
    let state = AppState::with_memory_store(Arc::new(BcryptHasher::new(4)), TEST_SECRET, 1);
    (router(state.clone()), state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

fn registration(email: &str, cpf: &str) -> Value {
    json!({
        "name": "Maria Souza",
        "email": email,
        "password": "segredo123",
        "cpf": cpf,
        "phone": "11987654321",
        "age": "30",
        "address": "Rua das Flores, 123 - São Paulo"
    })
}

/// Registers an account and returns (user id, token)
async fn register(app: &Router, email: &str, cpf: &str) -> (Uuid, String) {
    let (status, json) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(registration(email, cpf)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", json);

    let id = json["user"]["id"].as_str().unwrap().parse().unwrap();
    (id, json["token"].as_str().unwrap().to_string())
}

/// Registers an account, promotes it and logs in again for an admin token
async fn register_admin(app: &Router, state: &AppState) -> String {
    let (id, _) = register(app, "admin@loja.com.br", "11144477735").await;
    state.users.set_role(id, Role::Admin).await.unwrap();

    let (status, json) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@loja.com.br", "password": "segredo123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

async fn create_product(
    app: &Router,
    admin: &str,
    name: &str,
    price: Value,
    stock: i32,
) -> Value {
    let body = json!({
        "name": name,
        "price": price,
        "stock": stock,
        "category": "Periféricos"
    });
    let (status, json) = send(app, "POST", "/api/admin/products", Some(admin), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "product creation failed: {}", json);
    json
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_register_normalizes_fields() {
    let (app, _) = setup();

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(registration("maria@example.com", "52998224725")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["cpf"], "529.982.247-25");
    assert_eq!(json["user"]["phone"], "(11) 98765-4321");
    assert_eq!(json["user"]["age"], 30);
    assert_eq!(json["user"]["role"], "user");
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_reports_every_invalid_field() {
    let (app, _) = setup();

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Jo",
            "email": "not-an-email",
            "password": "123",
            "cpf": "123.456.789-00",
            "phone": "12345",
            "age": "dezoito",
            "address": "Rua A"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = json["fields"].as_object().unwrap();
    for field in ["name", "email", "password", "cpf", "phone", "age", "address"] {
        assert!(fields.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_register_with_missing_and_mistyped_fields_collects_errors() {
    let (app, _) = setup();

    for age in [json!(25.5), Value::Null] {
        let (status, json) = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "A1",
                "password": "123",
                "cpf": "111.111.111-11",
                "phone": "x",
                "age": age.clone(),
                "address": "Rua"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "age {}", age);
        let fields = json["fields"].as_object().unwrap();
        for field in ["name", "email", "password", "cpf", "phone", "age", "address"] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
    }
}

#[tokio::test]
async fn test_duplicate_cpf_is_a_conflict() {
    let (app, _) = setup();
    register(&app, "maria@example.com", "52998224725").await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(registration("outra@example.com", "529.982.247-25")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "CPF already registered");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (app, _) = setup();
    register(&app, "maria@example.com", "52998224725").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "maria@example.com", "password": "errada" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = setup();

    let (status, _) = send(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/orders", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_keeps_password_when_omitted() {
    let (app, _) = setup();
    let (_, token) = register(&app, "maria@example.com", "52998224725").await;

    let mut changes = registration("maria@example.com", "529.982.247-25");
    changes.as_object_mut().unwrap().remove("password");
    changes["address"] = json!("Avenida Paulista, 1000 - São Paulo");

    let (status, json) = send(&app, "PUT", "/api/users/me", Some(&token), Some(changes)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["address"], "Avenida Paulista, 1000 - São Paulo");

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "maria@example.com", "password": "segredo123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_customers_cannot_use_admin_routes() {
    let (app, _) = setup();
    let (_, token) = register(&app, "maria@example.com", "52998224725").await;

    let (status, _) = send(&app, "GET", "/api/admin/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_product_validation() {
    let (app, state) = setup();
    let admin = register_admin(&app, &state).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/admin/products",
        Some(&admin),
        Some(json!({ "name": "TV", "price": 0, "stock": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = json["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 3);
}

#[tokio::test]
async fn test_soft_deleted_product_leaves_catalog() {
    let (app, state) = setup();
    let admin = register_admin(&app, &state).await;
    let product = create_product(&app, &admin, "Teclado Mecânico", json!("349.90"), 10).await;
    let id = product["id"].as_str().unwrap();

    assert_eq!(product["price_cents"], 34990);
    assert_eq!(product["price_display"], "R$ 349,90");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/products/{}", id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, catalog) = send(&app, "GET", "/api/products", None, None).await;
    assert!(catalog.as_array().unwrap().is_empty());

    let (status, _) = send(&app, "GET", &format!("/api/products/{}", id), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(&app, "GET", "/api/admin/products", Some(&admin), None).await;
    assert_eq!(all[0]["active"], false);
}

#[tokio::test]
async fn test_order_flow() {
    let (app, state) = setup();
    let admin = register_admin(&app, &state).await;
    let (customer_id, customer) = register(&app, "maria@example.com", "52998224725").await;

    let mouse = create_product(&app, &admin, "Mouse Gamer", json!(149.90), 5).await;
    let headset = create_product(&app, &admin, "Headset HyperX", json!("499.00"), 2).await;

    // Step 1: Customer places an order; repeated lines are merged
    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(json!({
            "items": [
                { "product_id": mouse["id"], "quantity": 1 },
                { "product_id": headset["id"], "quantity": 1 },
                { "product_id": mouse["id"], "quantity": 1 }
            ],
            "delivery_address": "Rua das Flores, 123 - São Paulo",
            "notes": "Portão azul"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "order failed: {}", order);
    assert_eq!(order["status"], "pendente");
    assert_eq!(order["user_id"], customer_id.to_string());
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["total_cents"], 2 * 14990 + 49900);
    assert_eq!(order["total_display"], "R$ 798,80");
    let order_id = order["id"].as_str().unwrap().to_string();

    // Step 2: Stock was taken
    let mouse_uri = format!("/api/products/{}", mouse["id"].as_str().unwrap());
    let (_, current) = send(&app, "GET", &mouse_uri, None, None).await;
    assert_eq!(current["stock"], 3);

    // Step 3: Over-ordering is rejected
    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(json!({
            "items": [{ "product_id": headset["id"], "quantity": 5 }],
            "delivery_address": "Rua das Flores, 123 - São Paulo"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Step 4: Admin moves the order along its lifecycle
    let status_uri = format!("/api/admin/orders/{}/status", order_id);
    let skip_ahead = json!({ "status": "entregue" });
    let (status, _) = send(&app, "PUT", &status_uri, Some(&admin), Some(skip_ahead)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for next in ["processando", "entregue"] {
        let body = json!({ "status": next });
        let (status, json) = send(&app, "PUT", &status_uri, Some(&admin), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], next);
    }

    // Step 5: Customer sees the result
    let order_uri = format!("/api/orders/{}", order_id);
    let (status, fetched) = send(&app, "GET", &order_uri, Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "entregue");

    let (_, summary) = send(&app, "GET", "/api/orders/summary", Some(&customer), None).await;
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["delivered"], 1);
    assert_eq!(summary["open"], 0);

    // Other customers cannot see it
    let (_, other) = register(&app, "joao@example.com", "12345678909").await;
    let (status, _) = send(&app, "GET", &order_uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
