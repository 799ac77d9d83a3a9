//! Router-level tests: requests through the full axum stack, including
//! the admin session extractor and error-to-status mapping.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use bookstack_server::config::ServerConfig;
use bookstack_server::routes::routes;
use bookstack_server::services::AdminAuthService;
use bookstack_server::state::AppState;

use common::{seed_book, stock_of, test_pool};

async fn test_app() -> (Router, AppState) {
    let pool = test_pool().await;
    let config = ServerConfig {
        database_url: "sqlite::memory:".to_owned().into(),
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        admin_username: "admin".to_owned(),
        admin_password: "admin".to_owned().into(),
        sentry_dsn: None,
    };
    let state = AppState::new(config, pool);

    let auth = AdminAuthService::new(state.pool(), state.sessions(), state.password());
    auth.seed_default("admin", "admin").await.expect("seeding");

    (routes().with_state(state.clone()), state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/admin/login",
            json!({"username": "admin", "password": "admin"}),
        ))
        .await
        .expect("login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["session_token"]
        .as_str()
        .expect("token in response")
        .to_owned()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_get_books() {
    let (app, state) = test_app().await;
    let book = seed_book(state.pool(), "Dune", "12.50", 10).await;

    let response = app
        .clone()
        .oneshot(get_request("/books"))
        .await
        .expect("list request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = app
        .oneshot(get_request(&format!("/books/{}", book.id)))
        .await
        .expect("get request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["price"], "12.50");
}

#[tokio::test]
async fn test_get_missing_book_is_404() {
    let (app, _state) = test_app().await;
    let response = app
        .oneshot(get_request("/books/42"))
        .await
        .expect("get request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_create_order_returns_201() {
    let (app, state) = test_app().await;
    let book = seed_book(state.pool(), "Dune", "12.50", 10).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "customer_name": "Ada Lovelace",
                "email": "ada@example.com",
                "total_price": "25.00",
                "items": [{"book_id": book.id.as_i64(), "quantity": 2}],
            }),
        ))
        .await
        .expect("checkout request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["items"][0]["price_at_purchase"], "12.50");
    assert_eq!(stock_of(state.pool(), book.id.as_i64()).await, 8);
}

#[tokio::test]
async fn test_insufficient_stock_is_400() {
    let (app, state) = test_app().await;
    let book = seed_book(state.pool(), "Dune", "12.50", 1).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "customer_name": "Ada Lovelace",
                "email": "ada@example.com",
                "total_price": "25.00",
                "items": [{"book_id": book.id.as_i64(), "quantity": 2}],
            }),
        ))
        .await
        .expect("checkout request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|d| d.contains("insufficient stock"))
    );
    assert_eq!(stock_of(state.pool(), book.id.as_i64()).await, 1);
}

// =============================================================================
// Admin surface
// =============================================================================

#[tokio::test]
async fn test_bulk_endpoints_require_session() {
    let (app, _state) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/orders/bulk-status",
            json!({"order_ids": [1], "status": "done"}),
        ))
        .await
        .expect("unauthenticated request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/orders/bulk-delete")
                .header(header::AUTHORIZATION, "Bearer bogus")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"order_ids": [1]}).to_string()))
                .expect("valid request"),
        )
        .await
        .expect("bad token request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bulk_status_with_bearer_token() {
    let (app, state) = test_app().await;
    let book = seed_book(state.pool(), "Dune", "12.50", 10).await;

    let order = state
        .orders()
        .checkout(bookstack_server::models::NewOrder {
            customer_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            phone: None,
            address: None,
            postal_code: None,
            total_price: "12.50".parse().expect("valid total"),
            items: vec![bookstack_server::models::NewOrderItem {
                book_id: book.id,
                quantity: 1,
            }],
        })
        .await
        .expect("order placed");

    let token = login(&app).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/orders/bulk-status")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"order_ids": [order.id.as_i64()], "status": "done"}).to_string(),
                ))
                .expect("valid request"),
        )
        .await
        .expect("bulk status request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["updated"], 1);
    assert_eq!(body["status"], "done");
}

#[tokio::test]
async fn test_invalid_status_is_400_not_422() {
    let (app, _state) = test_app().await;
    let token = login(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/orders/bulk-status?token={token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"order_ids": [1], "status": "shipped"}).to_string(),
                ))
                .expect("valid request"),
        )
        .await
        .expect("bulk status request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|d| d.contains("invalid order status"))
    );
}

#[tokio::test]
async fn test_verify_and_logout_endpoints() {
    let (app, _state) = test_app().await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/admin/verify?token={token}")))
        .await
        .expect("verify request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert!(body["admin_id"].is_i64());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/admin/logout?token={token}"))
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("logout request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/admin/verify?token={token}")))
        .await
        .expect("second verify");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert!(body.get("admin_id").is_none());
}

#[tokio::test]
async fn test_bad_login_is_401() {
    let (app, _state) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/admin/login",
            json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Auth error: invalid username or password");
}
