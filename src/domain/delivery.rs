use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const EARTH_RADIUS_METERS: f64 = 6371e3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A radius band around the restaurant, in kilometres, with a flat price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryZone {
    pub min_radius: f64,
    pub max_radius: f64,
    pub price: i64,
}

impl DeliveryZone {
    pub fn contains(&self, distance_km: f64) -> bool {
        distance_km >= self.min_radius && distance_km <= self.max_radius
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    #[error("zone {0}: radius must be non-negative and finite")]
    InvalidRadius(usize),
    #[error("zone {0}: min radius must be smaller than max radius")]
    EmptyBand(usize),
    #[error("zone {0}: price must not be negative")]
    NegativePrice(usize),
    #[error("zones must be sorted by min radius and must not overlap (zone {0})")]
    Overlap(usize),
    #[error("the first zone must start at 0 km")]
    FirstNotAtOrigin,
}

/// Great-circle distance in metres.
pub fn haversine_distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn validate_zones(zones: &[DeliveryZone]) -> Result<(), ZoneError> {
    for (idx, zone) in zones.iter().enumerate() {
        let finite = zone.min_radius.is_finite() && zone.max_radius.is_finite();
        if !finite || zone.min_radius < 0.0 {
            return Err(ZoneError::InvalidRadius(idx));
        }
        if zone.min_radius >= zone.max_radius {
            return Err(ZoneError::EmptyBand(idx));
        }
        if zone.price < 0 {
            return Err(ZoneError::NegativePrice(idx));
        }
    }

    // bands may touch (7..15 after 0..7) but not overlap
    for (idx, pair) in zones.windows(2).enumerate() {
        if pair[1].min_radius < pair[0].max_radius {
            return Err(ZoneError::Overlap(idx + 1));
        }
    }

    if zones.len() > 1 && zones[0].min_radius != 0.0 {
        return Err(ZoneError::FirstNotAtOrigin);
    }

    Ok(())
}

/// First band containing the distance. Touching bands resolve to the inner one.
pub fn find_zone(distance_km: f64, zones: &[DeliveryZone]) -> Option<&DeliveryZone> {
    zones.iter().find(|zone| zone.contains(distance_km))
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn haversine_matches_known_distance() {
        // Warsaw Palace of Culture -> Krakow Main Square, roughly 252 km
        let warsaw = Coordinates {
            lat: 52.2318,
            lng: 21.0060,
        };
        let krakow = Coordinates {
            lat: 50.0617,
            lng: 19.9373,
        };
        let km = haversine_distance(warsaw, krakow) / 1000.0;
        assert!((km - 252.0).abs() < 3.0, "got {km}");
    }

    #[test]
    fn haversine_of_same_point_is_zero() {
        let p = Coordinates { lat: 10.0, lng: 20.0 };
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn zone_lookup_picks_matching_band() {
        let zones = zones();
        assert_eq!(find_zone(5.0, &zones).map(|z| z.price), Some(5));
        assert_eq!(find_zone(10.0, &zones).map(|z| z.price), Some(10));
        assert_eq!(find_zone(20.0, &zones), None);
        assert_eq!(find_zone(7.0, &zones).map(|z| z.price), Some(5));
    }

    #[test]
    fn valid_zones_pass() {
        assert_eq!(validate_zones(&zones()), Ok(()));
        assert_eq!(validate_zones(&[]), Ok(()));
    }

    #[test]
    fn single_zone_may_start_away_from_origin() {
        let zones = [DeliveryZone {
            min_radius: 2.0,
            max_radius: 5.0,
            price: 3,
        }];
        assert_eq!(validate_zones(&zones), Ok(()));
    }

    #[test]
    fn overlapping_zones_are_rejected() {
        let mut zones = zones();
        zones[1].min_radius = 6.0;
        assert_eq!(validate_zones(&zones), Err(ZoneError::Overlap(1)));
    }

    #[test]
    fn first_of_many_must_start_at_zero() {
        let mut zones = zones();
        zones[0].min_radius = 1.0;
        assert_eq!(validate_zones(&zones), Err(ZoneError::FirstNotAtOrigin));
    }

    #[test]
    fn inverted_band_is_rejected() {
        let zones = [DeliveryZone {
            min_radius: 5.0,
            max_radius: 5.0,
            price: 1,
        }];
        assert_eq!(validate_zones(&zones), Err(ZoneError::EmptyBand(0)));
    }
}
