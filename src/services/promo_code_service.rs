use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        DiscountType,
        promo::{check_promo, normalize_code},
    },
    dto::promo_codes::{
        CreatePromoCodeRequest, MarkPromoCodeUsedRequest, PromoCodeList, PromoValidation,
        UpdatePromoCodeRequest, ValidatePromoCodeRequest,
    },
    entity::promo_codes::{ActiveModel, Column, Entity as PromoCodes, Model as PromoCodeModel},
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::{DeliveryTime, PromoCode},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Looks up `code` and checks it can be redeemed at `at`.
///
/// With `lock` the row is held `FOR UPDATE` until the surrounding
/// transaction ends, so a one-time code cannot be redeemed twice.
pub async fn find_redeemable<C: ConnectionTrait>(
    db: &C,
    code: &str,
    at: DateTime<Utc>,
    lock: bool,
) -> AppResult<PromoCodeModel> {
    let mut finder = PromoCodes::find().filter(Column::Code.eq(normalize_code(code)));
    if lock {
        finder = finder.lock(LockType::Update);
    }
    let promo = finder.one(db).await?.ok_or(AppError::NotFound)?;

    check_promo(&promo.terms(), at).map_err(|rejection| AppError::BadRequest(rejection.to_string()))?;
    Ok(promo)
}

/// Flags a one-time code as used. The update only matches an unused row,
/// so losing a race surfaces as BAD_REQUEST instead of a second redemption.
pub async fn consume<C: ConnectionTrait>(db: &C, promo: &PromoCodeModel) -> AppResult<()> {
    if !promo.is_one_time_use {
        return Ok(());
    }

    let result = PromoCodes::update_many()
        .col_expr(Column::IsUsed, Expr::value(true))
        .filter(Column::Id.eq(promo.id))
        .filter(Column::IsUsed.eq(false))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::BadRequest("Promo code has already been used".into()));
    }
    Ok(())
}

pub async fn validate_promo_code(
    state: &AppState,
    payload: ValidatePromoCodeRequest,
) -> AppResult<ApiResponse<PromoValidation>> {
    payload.validate()?;

    let at = payload
        .delivery_time
        .and_then(DeliveryTime::instant)
        .unwrap_or_else(Utc::now);
    let promo = find_redeemable(&state.orm, &payload.code, at, false).await?;

    Ok(ApiResponse::success(
        "Promo code is valid",
        PromoValidation {
            code: promo.code,
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
        },
        None,
    ))
}

pub async fn mark_promo_code_used(
    state: &AppState,
    payload: MarkPromoCodeUsedRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    payload.validate()?;

    let promo = PromoCodes::find()
        .filter(Column::Code.eq(normalize_code(&payload.code)))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if promo.is_one_time_use && promo.is_used {
        return Err(AppError::BadRequest("Promo code has already been used".into()));
    }
    consume(&state.orm, &promo).await?;

    let promo = PromoCodes::find_by_id(promo.id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Promo code marked as used", promo.into(), None))
}

pub async fn list_promo_codes(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<PromoCodeList>> {
    let (page, limit, offset) = query.normalize();

    let finder = PromoCodes::find().order_by_desc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PromoCode::from)
        .collect();

    Ok(ApiResponse::success(
        "Promo codes",
        PromoCodeList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_promo_code(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PromoCode>> {
    let promo = PromoCodes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Promo code", promo.into(), None))
}

async fn ensure_code_free(state: &AppState, code: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut finder = PromoCodes::find().filter(Column::Code.eq(code));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest(format!("Promo code {code} already exists")));
    }
    Ok(())
}

pub async fn create_promo_code(
    state: &AppState,
    AdminUser(user): &AdminUser,
    payload: CreatePromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    payload.validate()?;

    let code = normalize_code(&payload.code);
    ensure_code_free(state, &code, None).await?;

    let promo = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        discount_type: Set(payload.discount_type),
        discount_value: Set(payload.discount_value),
        is_active: Set(payload.is_active),
        is_one_time_use: Set(payload.is_one_time_use),
        is_used: Set(false),
        start_date: Set(payload.start_date.map(Into::into)),
        expires_at: Set(payload.expires_at.map(Into::into)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "promo_code_create",
        "promo_codes",
        serde_json::json!({ "promo_code_id": promo.id, "code": promo.code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Promo code created",
        promo.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_promo_code(
    state: &AppState,
    AdminUser(user): &AdminUser,
    id: Uuid,
    payload: UpdatePromoCodeRequest,
) -> AppResult<ApiResponse<PromoCode>> {
    payload.validate()?;

    let existing = PromoCodes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let discount_type = payload.discount_type.unwrap_or(existing.discount_type);
    let discount_value = payload.discount_value.unwrap_or(existing.discount_value);
    if discount_type == DiscountType::Percentage && discount_value > 100 {
        return Err(AppError::BadRequest("Percentage discount cannot exceed 100".into()));
    }

    let mut active: ActiveModel = existing.into();
    if let Some(code) = payload.code {
        let code = normalize_code(&code);
        ensure_code_free(state, &code, Some(id)).await?;
        active.code = Set(code);
    }
    active.discount_type = Set(discount_type);
    active.discount_value = Set(discount_value);
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(one_time) = payload.is_one_time_use {
        active.is_one_time_use = Set(one_time);
    }
    if let Some(used) = payload.is_used {
        active.is_used = Set(used);
    }
    if let Some(start) = payload.start_date {
        active.start_date = Set(start.map(Into::into));
    }
    if let Some(end) = payload.expires_at {
        active.expires_at = Set(end.map(Into::into));
    }
    let promo = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "promo_code_update",
        "promo_codes",
        serde_json::json!({ "promo_code_id": promo.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", promo.into(), Some(Meta::empty())))
}

pub async fn delete_promo_code(
    state: &AppState,
    AdminUser(user): &AdminUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = PromoCodes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "promo_code_delete",
        "promo_codes",
        serde_json::json!({ "promo_code_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}
