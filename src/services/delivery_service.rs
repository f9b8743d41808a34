use sea_orm::{EntityTrait, QueryOrder, Set, TransactionTrait};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{Coordinates, DeliveryZone, delivery},
    dto::delivery::{CheckAddressRequest, DeliveryQuote, ZoneList},
    entity::delivery_zones::{ActiveModel as ZoneActive, Column as ZoneCol, Entity as Zones},
    error::{AppError, AppResult},
    geocoding::Geocoder,
    middleware::auth::AdminUser,
    response::{ApiResponse, Meta},
    services::settings_service::load_settings,
    state::AppState,
};

/// Geocodes the address and prices it against the zone bands.
///
/// With no zones configured every geocodable address is accepted at
/// `fallback` when one is set. Geocoding failures are treated as out of area.
pub async fn quote_address(
    geocoder: &dyn Geocoder,
    origin: Coordinates,
    zones: &[DeliveryZone],
    fallback: Option<i64>,
    address: &CheckAddressRequest,
) -> DeliveryQuote {
    let query = address.to_query();
    let coords = match geocoder.geocode(&query).await {
        Ok(Some(coords)) => coords,
        Ok(None) => {
            tracing::info!(address = %query, "address not found by geocoder");
            return DeliveryQuote::outside();
        }
        Err(err) => {
            tracing::warn!(error = %err, address = %query, "geocoding failed");
            return DeliveryQuote::outside();
        }
    };

    let distance_km = delivery::haversine_distance(origin, coords) / 1000.0;

    if zones.is_empty() {
        return match fallback {
            Some(price) => DeliveryQuote {
                in_delivery_area: true,
                distance_km: Some(distance_km),
                price: Some(price),
            },
            None => DeliveryQuote {
                distance_km: Some(distance_km),
                ..DeliveryQuote::outside()
            },
        };
    }

    match delivery::find_zone(distance_km, zones) {
        Some(zone) => DeliveryQuote {
            in_delivery_area: true,
            distance_km: Some(distance_km),
            price: Some(zone.price),
        },
        None => DeliveryQuote {
            distance_km: Some(distance_km),
            ..DeliveryQuote::outside()
        },
    }
}

pub async fn is_address_in_delivery_area(
    geocoder: &dyn Geocoder,
    origin: Coordinates,
    zones: &[DeliveryZone],
    fallback: Option<i64>,
    address: &CheckAddressRequest,
) -> bool {
    quote_address(geocoder, origin, zones, fallback, address)
        .await
        .in_delivery_area
}

pub async fn load_zones(state: &AppState) -> AppResult<Vec<DeliveryZone>> {
    let zones = Zones::find()
        .order_by_asc(ZoneCol::MinRadiusKm)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(DeliveryZone::from)
        .collect();
    Ok(zones)
}

pub async fn check_address(
    state: &AppState,
    payload: CheckAddressRequest,
) -> AppResult<ApiResponse<DeliveryQuote>> {
    payload.validate()?;

    let zones = load_zones(state).await?;
    let settings = load_settings(&state.orm).await?;
    let quote = quote_address(
        state.geocoder.as_ref(),
        state.config.restaurant_origin,
        &zones,
        settings.delivery_cost_fallback,
        &payload,
    )
    .await;

    Ok(ApiResponse::success("OK", quote, None))
}

pub async fn list_zones(state: &AppState) -> AppResult<ApiResponse<ZoneList>> {
    let zones = load_zones(state).await?;
    Ok(ApiResponse::success("OK", ZoneList { zones }, None))
}

/// Replaces every zone in one transaction.
pub async fn replace_zones(
    state: &AppState,
    AdminUser(user): &AdminUser,
    payload: ZoneList,
) -> AppResult<ApiResponse<ZoneList>> {
    delivery::validate_zones(&payload.zones).map_err(|err| AppError::BadRequest(err.to_string()))?;

    let txn = state.orm.begin().await?;
    Zones::delete_many().exec(&txn).await?;
    if !payload.zones.is_empty() {
        let rows = payload.zones.iter().map(|zone| ZoneActive {
            id: Set(Uuid::new_v4()),
            min_radius_km: Set(zone.min_radius),
            max_radius_km: Set(zone.max_radius),
            price: Set(zone.price),
        });
        Zones::insert_many(rows).exec(&txn).await?;
    }
    txn.commit().await?;

    tracing::info!(count = payload.zones.len(), "delivery zones replaced");
    audit::record(
        state,
        Some(user.user_id),
        "delivery_zones_replace",
        "delivery_zones",
        serde_json::json!({ "count": payload.zones.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Delivery zones updated",
        payload,
        Some(Meta::empty()),
    ))
}
