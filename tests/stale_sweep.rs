mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use restaurant_ordering_api::{
    domain::{DeliveryMethod, MenuCategory, PaymentMethod},
    dto::orders::{CreateOrderRequest, OrderItemInput},
    entity::orders::{Column as OrderCol, Entity as Orders},
    mailer::Mailer,
    middleware::auth::ROLE_STAFF,
    models::DeliveryTime,
    services::{notification_service, order_service},
    state::AppState,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use uuid::Uuid;

async fn place(state: &AppState, item: Uuid) -> anyhow::Result<Uuid> {
    let created = order_service::create_order(
        state,
        CreateOrderRequest {
            customer_name: "Anna".into(),
            phone: "600100200".into(),
            delivery_method: DeliveryMethod::TakeOut,
            payment_method: PaymentMethod::Card,
            delivery_time: DeliveryTime::Asap,
            address: None,
            nip: None,
            comment: None,
            promo_code: None,
            items: vec![OrderItemInput {
                menu_item_id: item,
                quantity: 1,
            }],
            total_amount: 3200,
            final_amount: 3200,
            idempotency_key: None,
        },
    )
    .await?;
    Ok(created.data.unwrap().id)
}

async fn backdate(state: &AppState, id: Uuid, by: Duration) -> anyhow::Result<()> {
    let at: DateTime<FixedOffset> = (Utc::now() - by).into();
    Orders::update_many()
        .col_expr(OrderCol::StatusUpdatedAt, Expr::value(at))
        .filter(OrderCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

async fn notified_at(
    state: &AppState,
    id: Uuid,
) -> anyhow::Result<Option<DateTime<FixedOffset>>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    Ok(order.and_then(|o| o.notified_at))
}

// A stale pending order is reported exactly once, even across a mail outage.
// Fresh or accepted orders are never claimed.
#[tokio::test]
async fn stale_orders_are_reported_once() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let mailer = common::RecordingMailer::new();
    let shared: Arc<dyn Mailer> = mailer.clone();
    let state = common::setup_state(&database_url).await?.with_mailer(shared);

    let pizza = common::insert_menu_item(&state, "Margherita", MenuCategory::Pizza, 3200).await?;
    let stale = place(&state, pizza).await?;
    let fresh = place(&state, pizza).await?;
    backdate(&state, stale, Duration::minutes(15)).await?;

    // mail outage: nothing is claimed for good
    mailer.set_failing(true);
    let swept = notification_service::sweep_stale_orders(&state, Utc::now()).await?;
    assert!(swept.is_empty());
    assert_eq!(notified_at(&state, stale).await?, None);

    mailer.set_failing(false);
    let swept = notification_service::sweep_stale_orders(&state, Utc::now()).await?;
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].id, stale);
    assert!(notified_at(&state, stale).await?.is_some());
    assert_eq!(notified_at(&state, fresh).await?, None);

    let subjects = mailer.subjects();
    assert_eq!(subjects.len(), 1);
    assert!(subjects[0].contains(&stale.to_string()[..8]), "{subjects:?}");

    let again = notification_service::sweep_stale_orders(&state, Utc::now()).await?;
    assert!(again.is_empty());
    assert_eq!(mailer.subjects().len(), 1);

    // the claim itself re-checks status and age, not just the candidate scan
    let accepted = place(&state, pizza).await?;
    let staff = common::create_user(&state, ROLE_STAFF).await?;
    order_service::advance_order_status(&state, &staff, accepted).await?;
    backdate(&state, accepted, Duration::minutes(15)).await?;

    let now = Utc::now();
    let cutoff: DateTime<FixedOffset> = (now - Duration::minutes(10)).into();
    let stamp: DateTime<FixedOffset> = now.into();
    assert!(!notification_service::claim_stale_order(&state.orm, accepted, cutoff, stamp).await?);
    assert!(!notification_service::claim_stale_order(&state.orm, fresh, cutoff, stamp).await?);
    assert_eq!(notified_at(&state, accepted).await?, None);
    assert_eq!(notified_at(&state, fresh).await?, None);

    Ok(())
}
