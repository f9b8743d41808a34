use std::{convert::Infallible, time::Duration};

use axum::response::sse::Event;
use chrono::{DateTime, FixedOffset, Utc};
use futures::{Stream, stream};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::OrderStatus,
    dto::orders::{NotifyPendingRequest, OrdersSince, OrdersSinceQuery, SweepReport},
    entity::orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    models::Order,
    response::ApiResponse,
    services::order_service::same_phone,
    state::AppState,
};

const SSE_INTERVAL: Duration = Duration::from_secs(5);

fn recent_window() -> chrono::Duration {
    chrono::Duration::minutes(1)
}

/// Orders created or moved to a new status strictly after `since`.
pub async fn orders_since(
    state: &AppState,
    query: OrdersSinceQuery,
) -> AppResult<ApiResponse<OrdersSince>> {
    let server_time = Utc::now();
    let since = query
        .last_updated_at
        .unwrap_or(server_time - recent_window());
    let since: DateTime<FixedOffset> = since.into();

    let orders = Orders::find()
        .filter(
            Condition::any()
                .add(OrderCol::CreatedAt.gt(since))
                .add(OrderCol::StatusUpdatedAt.gt(since)),
        )
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrdersSince {
            orders,
            server_time,
        },
        None,
    ))
}

pub async fn recent_orders<C: ConnectionTrait>(db: &C, now: DateTime<Utc>) -> AppResult<Vec<Order>> {
    let since: DateTime<FixedOffset> = (now - recent_window()).into();
    let orders = Orders::find()
        .filter(OrderCol::CreatedAt.gte(since))
        .order_by_desc(OrderCol::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();
    Ok(orders)
}

/// Server-sent `orders` events, one every five seconds, each listing the
/// orders created within the last minute.
pub fn order_events(state: AppState) -> impl Stream<Item = Result<Event, Infallible>> {
    let ticker = tokio::time::interval(SSE_INTERVAL);
    stream::unfold((state, ticker), |(state, mut ticker)| async move {
        ticker.tick().await;
        let event = match recent_orders(&state.orm, Utc::now()).await {
            Ok(orders) => Event::default()
                .event("orders")
                .json_data(&orders)
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "failed to encode order event");
                    Event::default().comment("encoding failed")
                }),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load recent orders");
                Event::default().event("error").data("failed to load orders")
            }
        };
        Some((Ok(event), (state, ticker)))
    })
}

/// Emails staff about every order that has sat in PENDING for longer than the
/// configured threshold and has not been reported yet.
///
/// Each order is claimed through [`claim_stale_order`], so overlapping sweeps
/// never report the same order twice and an order accepted in the meantime
/// is skipped. A failed email
/// releases the claim for the next sweep.
pub async fn sweep_stale_orders(state: &AppState, now: DateTime<Utc>) -> AppResult<Vec<Order>> {
    let cutoff: DateTime<FixedOffset> = (now - state.config.stale_order_after).into();
    let stamp: DateTime<FixedOffset> = now.into();

    let candidates = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::Pending))
        .filter(OrderCol::StatusUpdatedAt.lte(cutoff))
        .filter(OrderCol::NotifiedAt.is_null())
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut notified = Vec::new();
    for order in candidates {
        if !claim_stale_order(&state.orm, order.id, cutoff, stamp).await? {
            continue;
        }

        let (subject, body) = stale_order_message(&order, state.config.restaurant_offset);
        if let Err(err) = state.mailer.send(&subject, &body).await {
            tracing::error!(order_id = %order.id, error = %err, "stale order email failed");
            Orders::update_many()
                .col_expr(OrderCol::NotifiedAt, Expr::value(Option::<DateTime<FixedOffset>>::None))
                .filter(OrderCol::Id.eq(order.id))
                .exec(&state.orm)
                .await?;
            continue;
        }

        tracing::info!(order_id = %order.id, "stale order reported");
        let mut order = Order::from(order);
        order.notified_at = Some(now);
        notified.push(order);
    }

    Ok(notified)
}

/// Stamps `notified_at` only while the order is still pending, still past
/// `cutoff` and not yet claimed. Returns whether this caller won the claim.
pub async fn claim_stale_order<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    cutoff: DateTime<FixedOffset>,
    stamp: DateTime<FixedOffset>,
) -> AppResult<bool> {
    let claimed = Orders::update_many()
        .col_expr(OrderCol::NotifiedAt, Expr::value(stamp))
        .filter(OrderCol::Id.eq(id))
        .filter(OrderCol::Status.eq(OrderStatus::Pending))
        .filter(OrderCol::StatusUpdatedAt.lte(cutoff))
        .filter(OrderCol::NotifiedAt.is_null())
        .exec(db)
        .await?;
    Ok(claimed.rows_affected == 1)
}

pub async fn check_stale_orders(state: &AppState) -> AppResult<ApiResponse<SweepReport>> {
    let notified = sweep_stale_orders(state, Utc::now()).await?;
    let message = format!("Notified about {} orders", notified.len());
    Ok(ApiResponse::success(message, SweepReport { notified }, None))
}

/// Runs the stale order sweep on a fixed period for deployments without an
/// external scheduler.
pub fn spawn_stale_sweeper(state: AppState, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match sweep_stale_orders(&state, Utc::now()).await {
                Ok(notified) if !notified.is_empty() => {
                    tracing::info!(count = notified.len(), "stale order sweep finished");
                }
                Ok(_) => {}
                Err(err) => tracing::error!(error = %err, "stale order sweep failed"),
            }
        }
    })
}

pub async fn notify_pending(
    state: &AppState,
    payload: NotifyPendingRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.validate()?;

    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .filter(|order| same_phone(&order.phone, &payload.phone))
        .ok_or(AppError::NotFound)?;

    let subject = format!("New order from {}", payload.name.trim());
    let body = format!(
        "New order {id}\nCustomer: {name}\nPhone: {phone}\nAmount: {amount}\nDelivery: {method:?}\n",
        id = order.id,
        name = payload.name.trim(),
        phone = order.phone,
        amount = format_amount(payload.final_amount),
        method = order.delivery_method,
    );

    state.mailer.send(&subject, &body).await.map_err(|err| {
        tracing::error!(order_id = %order.id, error = %err, "new order email failed");
        AppError::Upstream("Failed to send notification".into())
    })?;

    Ok(ApiResponse::success(
        "Notification sent",
        serde_json::json!({ "order_id": order.id }),
        None,
    ))
}

fn stale_order_message(order: &OrderModel, offset: FixedOffset) -> (String, String) {
    let placed = order.created_at.with_timezone(&offset).format("%H:%M");
    let subject = format!("Order {} is still pending", short_id(order));
    let body = format!(
        "Order {id} placed at {placed} by {name} ({phone}) has not been accepted yet.\nAmount: {amount}\n",
        id = order.id,
        name = order.customer_name,
        phone = order.phone,
        amount = format_amount(order.final_amount),
    );
    (subject, body)
}

fn short_id(order: &OrderModel) -> String {
    order.id.simple().to_string()[..8].to_string()
}

/// Minor units to `"12.50"`.
pub(crate) fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryMethod, PaymentMethod};
    use chrono::TimeZone;

    #[test]
    fn amounts_are_rendered_with_two_decimals() {
        assert_eq!(format_amount(4000), "40.00");
        assert_eq!(format_amount(1205), "12.05");
        assert_eq!(format_amount(7), "0.07");
    }

    #[test]
    fn stale_message_uses_local_time() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 17, 5, 0).unwrap();
        let order = OrderModel {
            id: Uuid::nil(),
            customer_name: "Anna".into(),
            phone: "600100200".into(),
            delivery_method: DeliveryMethod::TakeOut,
            payment_method: PaymentMethod::Cash,
            delivery_time: None,
            city: None,
            postal_code: None,
            street: None,
            building_number: None,
            apartment: None,
            nip: None,
            comment: None,
            promo_code: None,
            total_amount: 4000,
            final_amount: 3600,
            status: OrderStatus::Pending,
            status_updated_at: created.into(),
            notified_at: None,
            idempotency_key: None,
            created_at: created.into(),
        };
        let offset = FixedOffset::east_opt(3600).unwrap();

        let (subject, body) = stale_order_message(&order, offset);
        assert_eq!(subject, "Order 00000000 is still pending");
        assert!(body.contains("placed at 18:05"));
        assert!(body.contains("36.00"));
    }
}
