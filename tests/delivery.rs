mod common;

use common::{FailingGeocoder, FixedGeocoder, ORIGIN};
use restaurant_ordering_api::{
    domain::{Coordinates, DeliveryZone},
    dto::delivery::CheckAddressRequest,
    services::delivery_service::{is_address_in_delivery_area, quote_address},
};

// kilometres per degree of latitude on a sphere of radius 6371 km
const KM_PER_DEGREE: f64 = 111.19508;

fn north_of_origin(km: f64) -> Coordinates {
    Coordinates {
        lat: ORIGIN.lat + km / KM_PER_DEGREE,
        lng: ORIGIN.lng,
    }
}

fn zones() -> Vec<DeliveryZone> {
    vec![
        DeliveryZone {
            min_radius: 0.0,
            max_radius: 7.0,
            price: 5,
        },
        DeliveryZone {
            min_radius: 7.0,
            max_radius: 15.0,
            price: 10,
        },
    ]
}

fn address() -> CheckAddressRequest {
    CheckAddressRequest {
        city: "Warszawa".into(),
        postal_code: "00-001".into(),
        street: "Marszałkowska".into(),
        building_number: "10".into(),
    }
}

#[tokio::test]
async fn zone_price_follows_distance() {
    let zones = zones();

    let quote = quote_address(&FixedGeocoder(Some(north_of_origin(5.0))), ORIGIN, &zones, None, &address()).await;
    assert!(quote.in_delivery_area);
    assert_eq!(quote.price, Some(5));
    let km = quote.distance_km.unwrap();
    assert!((km - 5.0).abs() < 0.01, "got {km}");

    let quote = quote_address(&FixedGeocoder(Some(north_of_origin(10.0))), ORIGIN, &zones, None, &address()).await;
    assert!(quote.in_delivery_area);
    assert_eq!(quote.price, Some(10));

    let quote = quote_address(&FixedGeocoder(Some(north_of_origin(20.0))), ORIGIN, &zones, None, &address()).await;
    assert!(!quote.in_delivery_area);
    assert_eq!(quote.price, None);
    assert!(quote.distance_km.is_some());
}

#[tokio::test]
async fn unknown_or_failed_geocoding_is_outside() {
    let zones = zones();

    assert!(!is_address_in_delivery_area(&FixedGeocoder(None), ORIGIN, &zones, None, &address()).await);
    assert!(!is_address_in_delivery_area(&FailingGeocoder, ORIGIN, &zones, None, &address()).await);
}

#[tokio::test]
async fn empty_zone_list_uses_fallback_cost() {
    let geocoder = FixedGeocoder(Some(north_of_origin(30.0)));

    let quote = quote_address(&geocoder, ORIGIN, &[], Some(1500), &address()).await;
    assert!(quote.in_delivery_area);
    assert_eq!(quote.price, Some(1500));

    assert!(!is_address_in_delivery_area(&geocoder, ORIGIN, &[], None, &address()).await);
}
