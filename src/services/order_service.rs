use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        DeliveryMethod, OrderStatus,
        promo::apply_discount,
        status::{self, can_transition, status_table},
    },
    dto::orders::{
        CreateOrderRequest, CreatedOrder, OrderList, OrderWithItems, StatusTable,
        UpdateOrderStatusRequest,
    },
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems, Model as MenuItemModel},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AdminUser, AuthUser},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{promo_code_service, settings_service},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<CreatedOrder>> {
    payload.validate()?;

    let now = Utc::now();
    let delivery_time = payload.delivery_time.truncated();
    if delivery_time.instant().is_some_and(|at| at <= now) {
        return Err(AppError::BadRequest("Delivery time must be in the future".into()));
    }

    let idempotency_key = payload.idempotency_key.clone();
    if let Some(key) = idempotency_key.as_deref() {
        if let Some(existing) = already_placed(state, key).await? {
            return Ok(existing);
        }
    }

    let settings = settings_service::load_settings(&state.orm).await?;
    if !settings.ordering_open {
        return Err(AppError::BadRequest("Ordering is currently closed".into()));
    }

    let menu = load_menu_items(state, &payload).await?;
    // availability is judged at the time the food is wanted
    let served_at = delivery_time.instant().unwrap_or(now);
    let local_served_at = settings_service::local_time(state.config.restaurant_offset, served_at);
    for input in &payload.items {
        let item = menu.get(&input.menu_item_id).ok_or_else(|| {
            AppError::BadRequest(format!("Menu item {} does not exist", input.menu_item_id))
        })?;
        if !item.is_active || !item.is_orderable {
            return Err(AppError::BadRequest(format!(
                "{} cannot be ordered right now",
                item.name
            )));
        }
        if !settings_service::is_category_available(&settings, item.category, local_served_at) {
            return Err(AppError::BadRequest(format!(
                "{} is not available at this time",
                item.name
            )));
        }
    }

    let (order, items) =
        match insert_order(state, payload, delivery_time.instant(), served_at, now).await {
            Ok(inserted) => inserted,
            Err(err) => {
                // a concurrent retry with the same key may have committed first
                if let Some(key) = idempotency_key.as_deref() {
                    if let Ok(Some(existing)) = already_placed(state, key).await {
                        return Ok(existing);
                    }
                }
                return Err(err);
            }
        };

    tracing::info!(
        order_id = %order.id,
        final_amount = order.final_amount,
        method = ?order.delivery_method,
        "order created"
    );
    audit::record(
        state,
        None,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "promo_code": order.promo_code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        created_order(order, items),
        Some(Meta::empty()),
    ))
}

/// Promo redemption, the order row and its items commit together.
async fn insert_order(
    state: &AppState,
    payload: CreateOrderRequest,
    delivery_time: Option<DateTime<Utc>>,
    served_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<(OrderModel, Vec<OrderItem>)> {
    let txn = state.orm.begin().await?;

    let promo_code = match payload.promo_code.as_deref() {
        Some(code) => {
            let promo = promo_code_service::find_redeemable(&txn, code, served_at, true).await?;
            promo_code_service::consume(&txn, &promo).await?;
            let expected =
                apply_discount(payload.total_amount, promo.discount_type, promo.discount_value);
            if expected != payload.final_amount {
                tracing::warn!(
                    code = %promo.code,
                    expected,
                    submitted = payload.final_amount,
                    "final amount differs from discounted total"
                );
            }
            Some(promo.code)
        }
        None => None,
    };

    // take-out orders carry no address even if the client sent one
    let address = match payload.delivery_method {
        DeliveryMethod::Delivery => payload.address,
        DeliveryMethod::TakeOut => None,
    };

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        customer_name: Set(payload.customer_name.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        delivery_method: Set(payload.delivery_method),
        payment_method: Set(payload.payment_method),
        delivery_time: Set(delivery_time.map(Into::into)),
        city: Set(address.as_ref().map(|a| a.city.clone())),
        postal_code: Set(address.as_ref().map(|a| a.postal_code.clone())),
        street: Set(address.as_ref().map(|a| a.street.clone())),
        building_number: Set(address.as_ref().map(|a| a.building_number.clone())),
        apartment: Set(address.as_ref().and_then(|a| a.apartment.clone())),
        nip: Set(payload.nip),
        comment: Set(payload.comment),
        promo_code: Set(promo_code),
        total_amount: Set(payload.total_amount),
        final_amount: Set(payload.final_amount),
        status: Set(OrderStatus::Pending),
        status_updated_at: Set(now.into()),
        notified_at: Set(None),
        idempotency_key: Set(payload.idempotency_key),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            menu_item_id: Set(input.menu_item_id),
            quantity: Set(input.quantity),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));
    }

    txn.commit().await?;
    Ok((order, items))
}

async fn already_placed(
    state: &AppState,
    key: &str,
) -> AppResult<Option<ApiResponse<CreatedOrder>>> {
    let Some(existing) = Orders::find()
        .filter(OrderCol::IdempotencyKey.eq(key))
        .one(&state.orm)
        .await?
    else {
        return Ok(None);
    };

    tracing::info!(order_id = %existing.id, "duplicate submission, returning existing order");
    let items = load_items(&state.orm, existing.id).await?;
    Ok(Some(ApiResponse::success(
        "Order already placed",
        created_order(existing, items),
        None,
    )))
}

async fn load_menu_items(
    state: &AppState,
    payload: &CreateOrderRequest,
) -> AppResult<HashMap<Uuid, MenuItemModel>> {
    let ids: HashSet<Uuid> = payload.items.iter().map(|i| i.menu_item_id).collect();
    let items = MenuItems::find()
        .filter(MenuCol::Id.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();
    Ok(items)
}

/// Customer-facing lookup; the phone number acts as the shared secret.
pub async fn get_order_public(
    state: &AppState,
    id: Uuid,
    phone: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .filter(|order| same_phone(&order.phone, phone))
        .ok_or(AppError::NotFound)?;

    let items = load_items(&state.orm, order.id).await?;
    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order.into(),
            items,
        },
        None,
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(method) = query.delivery_method {
        condition = condition.add(OrderCol::DeliveryMethod.eq(method));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let items = load_items(&state.orm, order.id).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order.into(),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    AdminUser(user): &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id = %id, "order deleted");
    audit::record(
        state,
        Some(user.user_id),
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Moves the order one step along its state machine.
pub async fn advance_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = lock_order(&txn, id).await?;

    let step = status::transition(order.status, order.delivery_method);
    let next = step.next.ok_or_else(|| {
        AppError::BadRequest(format!("Order is already {}", order.status.as_str()))
    })?;

    let order = set_status(&txn, order, next).await?;
    txn.commit().await?;

    status_changed(state, user, &order).await;
    Ok(ApiResponse::success("Status updated", order.into(), Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    admin: &AdminUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = lock_order(&txn, id).await?;

    if !can_transition(order.status, payload.status, order.delivery_method) {
        return Err(AppError::BadRequest(format!(
            "Cannot change status from {} to {}",
            order.status.as_str(),
            payload.status.as_str()
        )));
    }

    let order = set_status(&txn, order, payload.status).await?;
    txn.commit().await?;

    status_changed(state, &admin.0, &order).await;
    Ok(ApiResponse::success("Status updated", order.into(), Some(Meta::empty())))
}

pub fn get_status_table() -> ApiResponse<StatusTable> {
    ApiResponse::success(
        "OK",
        StatusTable {
            delivery: status_table(DeliveryMethod::Delivery),
            take_out: status_table(DeliveryMethod::TakeOut),
        },
        None,
    )
}

async fn lock_order<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

async fn set_status<C: ConnectionTrait>(
    db: &C,
    order: OrderModel,
    next: OrderStatus,
) -> AppResult<OrderModel> {
    let mut active: OrderActive = order.into();
    active.status = Set(next);
    active.status_updated_at = Set(Utc::now().into());
    Ok(active.update(db).await?)
}

async fn status_changed(state: &AppState, user: &AuthUser, order: &OrderModel) {
    tracing::info!(order_id = %order.id, status = order.status.as_str(), "order status changed");
    audit::record(
        state,
        Some(user.user_id),
        "order_status",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;
}

pub async fn load_items<C: ConnectionTrait>(db: &C, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(items)
}

fn created_order(order: OrderModel, items: Vec<OrderItem>) -> CreatedOrder {
    let order = Order::from(order);
    CreatedOrder {
        id: order.id,
        phone: order.phone,
        customer_name: order.customer_name,
        delivery_method: order.delivery_method,
        delivery_time: order.delivery_time,
        status: order.status,
        items,
    }
}

/// Compares phone numbers by digits and leading `+` only.
pub(crate) fn same_phone(stored: &str, given: &str) -> bool {
    fn digits(phone: &str) -> String {
        phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }
    let given = digits(given);
    !given.is_empty() && digits(stored) == given
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_comparison_ignores_formatting() {
        assert!(same_phone("+48 600 100 200", "+48600-100-200"));
        assert!(!same_phone("+48 600 100 200", "600 100 200"));
        assert!(!same_phone("600100200", ""));
    }

    #[test]
    fn status_table_covers_both_methods() {
        let table = get_status_table().data.unwrap();
        assert_eq!(table.delivery.len(), 8);
        assert_eq!(table.take_out.len(), 8);
        let ready = table
            .take_out
            .iter()
            .find(|step| step.status == OrderStatus::Ready)
            .unwrap();
        assert_eq!(ready.next, Some(OrderStatus::Completed));
    }
}
