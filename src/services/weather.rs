use crate::core::providers::{WeatherError, WeatherProvider};
use crate::models::{WeatherCondition, WeatherSnapshot};
use async_trait::async_trait;

/// Weather provider that always reports the same snapshot
///
/// Stands in for a live weather integration; defaults to a clear 26°C day.
#[derive(Debug, Clone, Copy)]
pub struct StaticWeatherProvider {
    snapshot: WeatherSnapshot,
}

impl StaticWeatherProvider {
    pub fn new(snapshot: WeatherSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for StaticWeatherProvider {
    fn default() -> Self {
        Self::new(WeatherSnapshot::new(WeatherCondition::Clear, 26.0))
    }
}

#[async_trait]
impl WeatherProvider for StaticWeatherProvider {
    async fn current(&self) -> Result<WeatherSnapshot, WeatherError> {
        Ok(self.snapshot)
    }
}
