//! Address to coordinates lookup.
//!
//! Every call goes to the provider; results are not cached.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Coordinates;

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding is not configured")]
    NotConfigured,
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("geocoding provider returned status {0}")]
    Provider(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the provider knows no such address.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let api_key = self.api_key.as_deref().ok_or(GeocodeError::NotConfigured)?;

        let body: GeocodeResponse = self
            .client
            .get(GOOGLE_GEOCODE_URL)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().next().map(|r| r.geometry.location)),
            "ZERO_RESULTS" => Ok(None),
            other => Err(GeocodeError::Provider(other.to_string())),
        }
    }
}
