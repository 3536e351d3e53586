use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;
use serde::Deserialize;

use roofline_domain::geo::GeoPoint;

use crate::domain::repository::Geocoder;

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Upper bound on one lookup, connect included. Capture-location waits on it.
pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reverse geocoding through the Google Maps Geocoding API.
///
/// Without an API key every lookup yields `None`.
#[derive(Clone)]
pub struct GoogleGeocoder {
    pub client: Client,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        Self::with_timeout(api_key, GEOCODE_TIMEOUT)
    }

    pub fn with_timeout(api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build geocode http client")?;
        Ok(Self {
            client,
            api_key,
            base_url: GOOGLE_GEOCODE_URL.to_owned(),
        })
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl Geocoder for GoogleGeocoder {
    async fn reverse(&self, point: GeoPoint) -> anyhow::Result<Option<String>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(None);
        };
        let url = format!(
            "{}?latlng={},{}&key={key}",
            self.base_url, point.lat, point.lon
        );
        let response: GeocodeResponse = self
            .client
            .get(url)
            .send()
            .await
            .context("send geocode request")?
            .error_for_status()
            .context("geocode request rejected")?
            .json()
            .await
            .context("decode geocode response")?;

        match response.status.as_str() {
            "OK" => Ok(response
                .results
                .into_iter()
                .next()
                .map(|r| r.formatted_address)),
            "ZERO_RESULTS" => Ok(None),
            other => anyhow::bail!(
                "geocode status {other}: {}",
                response.error_message.unwrap_or_default()
            ),
        }
    }
}
