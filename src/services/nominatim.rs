use crate::core::providers::{GeocodeError, Geocoder};
use crate::models::Coordinate;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
/// Nominatim's usage policy requires an identifying User-Agent
pub const DEFAULT_USER_AGENT: &str = "SustainableCommutePlannerApp/1.0";

/// Errors that can occur when interacting with Nominatim
#[derive(Debug, Error)]
pub enum NominatimError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<NominatimError> for GeocodeError {
    fn from(err: NominatimError) -> Self {
        match err {
            NominatimError::NotFound(place) => GeocodeError::NotFound(place),
            other => GeocodeError::Unavailable(other.to_string()),
        }
    }
}

/// One entry of a Nominatim `/search` response. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim (OpenStreetMap) geocoding client
///
/// Asks for at most one JSON result per place name. No retries.
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl NominatimClient {
    /// Create a new Nominatim client
    pub fn new(base_url: String, user_agent: String, timeout: Duration) -> Result<Self, NominatimError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.clone())
            .build()?;

        Ok(Self {
            base_url,
            user_agent,
            client,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn search_url(&self, place_name: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(place_name)
        )
    }

    /// Geocode a free-text place name
    ///
    /// A non-success status and an empty result list are both `NotFound`.
    pub async fn search(&self, place_name: &str) -> Result<Coordinate, NominatimError> {
        let url = self.search_url(place_name);

        tracing::debug!("Geocoding '{}' via {}", place_name, url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned {} for '{}'", response.status(), place_name);
            return Err(NominatimError::NotFound(place_name.to_string()));
        }

        let results: Vec<SearchResult> = response
            .json()
            .await
            .map_err(|e| NominatimError::InvalidResponse(format!("Failed to parse search results: {}", e)))?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| NominatimError::NotFound(place_name.to_string()))?;

        let latitude = parse_degrees(&first.lat)?;
        let longitude = parse_degrees(&first.lon)?;
        let coordinate = Coordinate::new(latitude, longitude)
            .map_err(|e| NominatimError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            "Found '{}' at {} ({})",
            place_name,
            coordinate,
            first.display_name.as_deref().unwrap_or("unnamed")
        );

        Ok(coordinate)
    }
}

fn parse_degrees(raw: &str) -> Result<f64, NominatimError> {
    raw.trim()
        .parse()
        .map_err(|_| NominatimError::InvalidResponse(format!("Invalid coordinate value '{}'", raw)))
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn resolve(&self, place_name: &str) -> Result<Coordinate, GeocodeError> {
        self.search(place_name).await.map_err(GeocodeError::from)
    }
}
