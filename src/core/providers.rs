use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Coordinate, WeatherSnapshot};

/// Errors a geocoder may report for a single place name
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("Weather service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves free-text place names to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, place_name: &str) -> Result<Coordinate, GeocodeError>;
}

/// Supplies the current weather snapshot
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self) -> Result<WeatherSnapshot, WeatherError>;
}
