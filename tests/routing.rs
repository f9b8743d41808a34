mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use restaurant_ordering_api::{
    middleware::auth::{ROLE_ADMIN, ROLE_STAFF},
    routes::create_api_router,
    services::auth_service::issue_token,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(common::offline_state())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn status_table_is_public() {
    let (status, body) = send(get("/api/orders/status-table")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["delivery"].as_array().unwrap().len(), 8);
    assert_eq!(body["data"]["delivery"][0]["status"], "PENDING");
    assert_eq!(body["data"]["delivery"][0]["next"], "ACCEPTED");
}

fn with_token(uri: &str, role: &str) -> Request<Body> {
    let token = issue_token(Uuid::new_v4(), role, "test-secret").unwrap();
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn admin_routes_need_an_admin_token() {
    let (status, _) = send(get("/api/admin/promo-codes")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(with_token("/api/admin/promo-codes", ROLE_STAFF)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(with_token("/api/orders/stream", "customer")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_can_open_the_order_event_stream() {
    let response = app()
        .oneshot(with_token("/api/orders/sse", ROLE_STAFF))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
}

#[tokio::test]
async fn cron_endpoint_checks_the_shared_secret() {
    let request = Request::builder()
        .uri("/api/orders/cron-check-orders")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_order_is_rejected_before_touching_the_database() {
    let payload = serde_json::json!({
        "customer_name": "Jan",
        "phone": "123",
        "delivery_method": "DELIVERY",
        "payment_method": "CASH",
        "delivery_time": "ASAP",
        "items": [],
        "total_amount": 1000,
        "final_amount": 1000
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn analytics_reports_disabled_without_a_provider() {
    let (status, body) = send(with_token("/api/analytics", ROLE_ADMIN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source"], "disabled");
}
