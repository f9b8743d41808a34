mod common;

use chrono::{DateTime, Duration, Utc};
use restaurant_ordering_api::{
    domain::{DeliveryMethod, DiscountType, MenuCategory, OrderStatus, PaymentMethod},
    dto::{
        orders::{CreateOrderRequest, OrderItemInput, UpdateOrderStatusRequest},
        promo_codes::{CreatePromoCodeRequest, ValidatePromoCodeRequest},
        settings::UpdateSettingsRequest,
    },
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::AppError,
    middleware::auth::ROLE_STAFF,
    models::DeliveryTime,
    services::{order_service, promo_code_service, settings_service},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

fn take_out(menu_item_id: Uuid, quantity: i32, amount: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Jan Kowalski".into(),
        phone: "+48 600 100 200".into(),
        delivery_method: DeliveryMethod::TakeOut,
        payment_method: PaymentMethod::Cash,
        delivery_time: DeliveryTime::Asap,
        address: None,
        nip: None,
        comment: None,
        promo_code: None,
        items: vec![OrderItemInput {
            menu_item_id,
            quantity,
        }],
        total_amount: amount,
        final_amount: amount,
        idempotency_key: None,
    }
}

// Customer side of ordering plus the staff status flow. Closing the kitchen
// last blocks new orders.
#[tokio::test]
async fn place_track_and_advance_orders() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let admin = common::create_admin(&state).await?;
    let staff = common::create_user(&state, ROLE_STAFF).await?;

    let pasta = common::insert_menu_item(&state, "Pasta", MenuCategory::Pasta, 2000).await?;

    // plain order
    let created = order_service::create_order(&state, take_out(pasta, 2, 4000))
        .await?
        .data
        .unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].quantity, 2);

    let fetched = order_service::get_order(&state, created.id).await?.data.unwrap();
    assert_eq!(fetched.order.total_amount, 4000);
    assert_eq!(fetched.order.final_amount, 4000);
    assert_eq!(fetched.order.city, None);

    // retried submission returns the first order
    let request = CreateOrderRequest {
        idempotency_key: Some("retry-key-0001".into()),
        ..take_out(pasta, 1, 2000)
    };
    let first = order_service::create_order(&state, request.clone()).await?;
    let second = order_service::create_order(&state, request).await?;
    assert_eq!(second.message, "Order already placed");
    assert_eq!(first.data.unwrap().id, second.data.unwrap().id);

    // concurrent retries both miss the first lookup
    let request = CreateOrderRequest {
        idempotency_key: Some("retry-key-0002".into()),
        ..take_out(pasta, 1, 2000)
    };
    let (a, b) = tokio::join!(
        order_service::create_order(&state, request.clone()),
        order_service::create_order(&state, request),
    );
    assert_eq!(a?.data.unwrap().id, b?.data.unwrap().id);
    let stored = Orders::find()
        .filter(OrderCol::IdempotencyKey.eq("retry-key-0002"))
        .count(&state.orm)
        .await?;
    assert_eq!(stored, 1);

    // one-time promo is redeemable exactly once
    promo_code_service::create_promo_code(
        &state,
        &admin,
        CreatePromoCodeRequest {
            code: "welcome5".into(),
            discount_type: DiscountType::Fixed,
            discount_value: 500,
            is_active: true,
            is_one_time_use: true,
            start_date: None,
            expires_at: None,
        },
    )
    .await?;

    let valid = promo_code_service::validate_promo_code(
        &state,
        ValidatePromoCodeRequest {
            code: "WELCOME5".into(),
            delivery_time: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(valid.discount_value, 500);

    let with_promo = CreateOrderRequest {
        promo_code: Some("WELCOME5".into()),
        final_amount: 1500,
        ..take_out(pasta, 1, 2000)
    };
    let promo_order = order_service::create_order(&state, with_promo.clone())
        .await?
        .data
        .unwrap();
    let promo_order = order_service::get_order(&state, promo_order.id).await?.data.unwrap();
    assert_eq!(promo_order.order.promo_code.as_deref(), Some("WELCOME5"));

    let reused = order_service::create_order(&state, with_promo).await;
    assert!(matches!(reused, Err(AppError::BadRequest(_))), "{reused:?}");

    // customer lookup needs the matching phone
    let public = order_service::get_order_public(&state, created.id, "+48600100200").await?;
    assert_eq!(public.data.unwrap().order.id, created.id);
    let wrong = order_service::get_order_public(&state, created.id, "+48 999 999 999").await;
    assert!(matches!(wrong, Err(AppError::NotFound)));

    // status machine
    let accepted = order_service::advance_order_status(&state, &staff, created.id)
        .await?
        .data
        .unwrap();
    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert!(accepted.status_updated_at >= fetched.order.status_updated_at);

    let skipped = order_service::update_order_status(
        &state,
        &admin,
        created.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Delivering,
        },
    )
    .await;
    assert!(matches!(skipped, Err(AppError::BadRequest(_))));

    let cancelled = order_service::update_order_status(
        &state,
        &admin,
        created.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let done = order_service::advance_order_status(&state, &staff, created.id).await;
    assert!(matches!(done, Err(AppError::BadRequest(_))));

    // pizza window applies to the requested delivery time
    let offset = state.config.restaurant_offset;
    let now = Utc::now();
    let local = |at: DateTime<Utc>| settings_service::local_time(offset, at);
    settings_service::update_settings(
        &state,
        &admin,
        UpdateSettingsRequest {
            pizza_available_from: Some(Some(local(now + Duration::hours(2)))),
            pizza_available_until: Some(Some(local(now + Duration::hours(4)))),
            ..Default::default()
        },
    )
    .await?;
    let pizza = common::insert_menu_item(&state, "Margherita", MenuCategory::Pizza, 3200).await?;

    let scheduled = CreateOrderRequest {
        delivery_time: DeliveryTime::At(now + Duration::hours(3)),
        ..take_out(pizza, 1, 3200)
    };
    let scheduled = order_service::create_order(&state, scheduled).await?;
    assert_eq!(scheduled.data.unwrap().status, OrderStatus::Pending);

    let asap = order_service::create_order(&state, take_out(pizza, 1, 3200)).await;
    assert!(matches!(asap, Err(AppError::BadRequest(_))), "{asap:?}");

    let too_late = CreateOrderRequest {
        delivery_time: DeliveryTime::At(now + Duration::hours(5)),
        ..take_out(pizza, 1, 3200)
    };
    let too_late = order_service::create_order(&state, too_late).await;
    assert!(matches!(too_late, Err(AppError::BadRequest(_))));

    // closed kitchen
    settings_service::update_settings(
        &state,
        &admin,
        UpdateSettingsRequest {
            ordering_open: Some(false),
            ..Default::default()
        },
    )
    .await?;
    let closed = order_service::create_order(&state, take_out(pasta, 1, 2000)).await;
    assert!(matches!(closed, Err(AppError::BadRequest(_))));

    Ok(())
}
