use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::Iterable;
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::MenuCategory,
    dto::menu::{CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
    entity::{
        menu_items::{ActiveModel, Column, Entity as MenuItems},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::MenuItem,
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    state::AppState,
};

/// Public menu: active items only.
pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    list(state, query, true).await
}

/// Admin view including inactive items.
pub async fn list_all_items(
    state: &AppState,
    query: MenuQuery,
) -> AppResult<ApiResponse<MenuList>> {
    list(state, query, false).await
}

async fn list(
    state: &AppState,
    query: MenuQuery,
    active_only: bool,
) -> AppResult<ApiResponse<MenuList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if active_only {
        condition = condition.add(Column::IsActive.eq(true));
    }
    if let Some(category) = query.category {
        condition = condition.add(Column::Category.eq(category));
    }
    if let Some(recommended) = query.recommended {
        condition = condition.add(Column::IsRecommended.eq(recommended));
    }
    if let Some(main_page) = query.main_page {
        condition = condition.add(Column::IsOnMainPage.eq(main_page));
    }
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    let finder = MenuItems::find()
        .filter(condition)
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Menu",
        MenuList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .filter(Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Menu item", item.into(), None))
}

pub fn categories() -> ApiResponse<Vec<MenuCategory>> {
    ApiResponse::success("Categories", MenuCategory::iter().collect(), None)
}

pub async fn create_menu_item(
    state: &AppState,
    AdminUser(user): &AdminUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    payload.validate()?;

    let now = Utc::now();
    let item = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        price: Set(payload.price),
        description: Set(payload.description),
        category: Set(payload.category),
        image_url: Set(payload.image_url),
        is_orderable: Set(payload.is_orderable),
        is_active: Set(payload.is_active),
        is_recommended: Set(payload.is_recommended),
        is_on_main_page: Set(payload.is_on_main_page),
        created_at: NotSet,
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "menu_item_create",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item created",
        item.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    AdminUser(user): &AdminUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    payload.validate()?;

    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(orderable) = payload.is_orderable {
        active.is_orderable = Set(orderable);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(recommended) = payload.is_recommended {
        active.is_recommended = Set(recommended);
    }
    if let Some(main_page) = payload.is_on_main_page {
        active.is_on_main_page = Set(main_page);
    }
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "menu_item_update",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", item.into(), Some(Meta::empty())))
}

/// Items referenced by past orders cannot be removed; deactivate them instead.
pub async fn delete_menu_item(
    state: &AppState,
    AdminUser(user): &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let in_use = OrderItems::find()
        .filter(OrderItemCol::MenuItemId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(
            "Menu item appears in existing orders, deactivate it instead".into(),
        ));
    }

    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "menu_item_delete",
        "menu_items",
        serde_json::json!({ "menu_item_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
