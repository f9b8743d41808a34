use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
};
use futures::Stream;
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, CreatedOrder, NotifyPendingRequest, OrderWithItems, OrdersSince,
        OrdersSinceQuery, PublicOrderQuery, StatusTable, SweepReport,
    },
    error::AppResult,
    middleware::auth::{CronAuth, StaffUser},
    response::ApiResponse,
    services::{notification_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/status-table", get(status_table))
        .route("/stream", get(orders_since))
        .route("/sse", get(order_events))
        .route("/cron-check-orders", get(cron_check_orders))
        .route("/notify-pending", post(notify_pending))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<CreatedOrder>),
        (status = 400, description = "Ordering closed, item unavailable or promo code rejected"),
        (status = 404, description = "Promo code not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<CreatedOrder>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("phone" = String, Query, description = "Phone number the order was placed with"),
    ),
    responses(
        (status = 200, description = "Order status for the customer", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PublicOrderQuery>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order_public(&state, id, &query.phone).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/status-table",
    responses(
        (status = 200, description = "Status progression per delivery method", body = ApiResponse<StatusTable>)
    ),
    tag = "Orders"
)]
pub async fn status_table() -> Json<ApiResponse<StatusTable>> {
    Json(order_service::get_status_table())
}

#[utoipa::path(
    get,
    path = "/api/orders/stream",
    params(
        ("lastUpdatedAt" = Option<String>, Query, description = "RFC 3339 cursor from the previous poll, default one minute ago"),
    ),
    responses(
        (status = 200, description = "Orders created or updated since the cursor", body = ApiResponse<OrdersSince>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn orders_since(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(query): Query<OrdersSinceQuery>,
) -> AppResult<Json<ApiResponse<OrdersSince>>> {
    let resp = notification_service::orders_since(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/sse",
    responses(
        (status = 200, description = "`orders` events every five seconds", content_type = "text/event-stream"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn order_events(
    State(state): State<AppState>,
    _staff: StaffUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(notification_service::order_events(state)).keep_alive(KeepAlive::default())
}

#[utoipa::path(
    get,
    path = "/api/orders/cron-check-orders",
    responses(
        (status = 200, description = "Stale pending orders that were reported", body = ApiResponse<SweepReport>),
        (status = 401, description = "Wrong cron secret"),
        (status = 403, description = "Cron endpoint disabled")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn cron_check_orders(
    State(state): State<AppState>,
    _cron: CronAuth,
) -> AppResult<Json<ApiResponse<SweepReport>>> {
    let resp = notification_service::check_stale_orders(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/notify-pending",
    request_body = NotifyPendingRequest,
    responses(
        (status = 200, description = "Staff notified about the new order"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Email delivery failed")
    ),
    tag = "Notifications"
)]
pub async fn notify_pending(
    State(state): State<AppState>,
    Json(payload): Json<NotifyPendingRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = notification_service::notify_pending(&state, payload).await?;
    Ok(Json(resp))
}
