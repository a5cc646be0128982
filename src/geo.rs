use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, SportsHubError};
use crate::http;
use crate::model::LatLng;

const EARTH_RADIUS_KM: f64 = 6371.0;
const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Great-circle distance between two points in kilometres (haversine).
pub fn get_distance_between_two_coords(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Resolves a free-text address to coordinates.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<LatLng>;
}

/// [`Geocoder`] backed by the Google Geocoding web service.
pub struct GoogleGeocoder {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GOOGLE_GEOCODE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
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
    location: LatLng,
}

#[async_trait::async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<LatLng> {
        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[("address", address), ("key", self.api_key.as_str())],
        )
        .map_err(|e| SportsHubError::Validation(format!("invalid geocoder url: {e}")))?;

        let response: GeocodeResponse =
            http::send_json(self.http.get(url.clone()), url.as_str()).await?;

        if response.status != "OK" {
            return Err(SportsHubError::Geocode {
                address: address.to_owned(),
                reason: response.status,
            });
        }

        let location = response
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| SportsHubError::Geocode {
                address: address.to_owned(),
                reason: "no results".to_string(),
            })?;

        debug!(lat = location.lat, lng = location.lng, "geocoded address");
        Ok(location)
    }
}
