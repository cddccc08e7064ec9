use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::distance::{geodesic_distance_km, midpoint};
use crate::core::matcher::{CarpoolMatcher, MatchError};
use crate::core::mode::select_mode;
use crate::core::providers::{GeocodeError, Geocoder, WeatherProvider};
use crate::models::{
    Commuter, Coordinate, MapMarker, MapView, Roster, TripRequest, TripResult, WeatherCondition,
    WeatherSnapshot, DEFAULT_MAP_ZOOM,
};

/// Snapshot used when the weather provider fails.
///
/// Not `Clear`, so walking and biking are never recommended on unknown weather.
pub const FALLBACK_WEATHER: WeatherSnapshot = WeatherSnapshot {
    condition: WeatherCondition::Unknown,
    temperature_c: 26.0,
};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Could not locate: {}", .places.join(", "))]
    LocationNotFound { places: Vec<String> },

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Carpool matching failed: {0}")]
    Matching(#[from] MatchError),
}

/// Request orchestration: geocode, measure, pick a mode, match carpools
///
/// Holds only read-only collaborators; every call works on request-scoped data.
#[derive(Clone)]
pub struct CommutePlanner {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    roster: Arc<Roster>,
    matcher: CarpoolMatcher,
    fallback_weather: WeatherSnapshot,
}

impl CommutePlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        roster: Arc<Roster>,
        matcher: CarpoolMatcher,
    ) -> Self {
        Self {
            geocoder,
            weather,
            roster,
            matcher,
            fallback_weather: FALLBACK_WEATHER,
        }
    }

    pub fn with_fallback_weather(mut self, fallback_weather: WeatherSnapshot) -> Self {
        self.fallback_weather = fallback_weather;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Plan a commute for one submission
    ///
    /// Fails with `LocationNotFound` if either place cannot be geocoded; in
    /// that case nothing else is computed.
    pub async fn plan(&self, request: &TripRequest) -> Result<TripResult, PlannerError> {
        let mut missing = Vec::new();
        let home = self.resolve(&request.home_place, &mut missing).await?;
        let work = self.resolve(&request.work_place, &mut missing).await?;

        let (home, work) = match (home, work) {
            (Some(home), Some(work)) => (home, work),
            _ => {
                warn!("Could not geocode: {:?}", missing);
                return Err(PlannerError::LocationNotFound { places: missing });
            }
        };

        let distance_km = geodesic_distance_km(&home, &work);

        let weather = match self.weather.current().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Weather lookup failed, using fallback {:?}: {}", self.fallback_weather, e);
                self.fallback_weather
            }
        };

        let preferences = request.preferences();
        let decision = select_mode(&preferences, &weather, distance_km);

        debug!(
            "Distance {:.2} km, weather {:?} at {}°C -> {}",
            distance_km, weather.condition, weather.temperature_c, decision.mode
        );

        let (carpool_matches, cluster_assignments) = if preferences.prefers_carpool {
            let query = Commuter {
                id: self.roster.next_id(),
                home,
                work,
                preferences,
            };
            let result = self.matcher.find_matches(&self.roster, &query)?;
            (result.matches, result.assignments)
        } else {
            (Vec::new(), Vec::new())
        };

        let matched_commuter_ids: Vec<u32> = carpool_matches.iter().map(|c| c.id).collect();

        info!(
            "Planned commute: {} over {:.2} km, {:.2} kg CO2 saved, {} carpool matches",
            decision.mode,
            distance_km,
            decision.emissions_saved_kg,
            matched_commuter_ids.len()
        );

        Ok(TripResult {
            request_id: uuid::Uuid::new_v4(),
            home,
            work,
            distance_km,
            weather,
            mode: decision.mode,
            mode_label: decision.mode.label().to_string(),
            emissions_saved_kg: decision.emissions_saved_kg,
            matched_commuter_ids,
            carpool_matches,
            cluster_assignments,
            map: route_map(home, work),
        })
    }

    /// `Ok(None)` records the place in `missing`; transport failures abort the request
    async fn resolve(&self, place: &str, missing: &mut Vec<String>) -> Result<Option<Coordinate>, PlannerError> {
        let place = place.trim();
        match self.geocoder.resolve(place).await {
            Ok(coordinate) => {
                debug!("Resolved '{}' to {}", place, coordinate);
                Ok(Some(coordinate))
            }
            Err(GeocodeError::NotFound(_)) => {
                missing.push(place.to_string());
                Ok(None)
            }
            Err(GeocodeError::Unavailable(reason)) => {
                tracing::error!("Geocoder unavailable while resolving '{}': {}", place, reason);
                Err(PlannerError::UpstreamUnavailable(reason))
            }
        }
    }
}

fn route_map(home: Coordinate, work: Coordinate) -> MapView {
    MapView {
        center: midpoint(&home, &work),
        zoom: DEFAULT_MAP_ZOOM,
        markers: vec![
            MapMarker {
                label: "Home".to_string(),
                position: home,
            },
            MapMarker {
                label: "Work".to_string(),
                position: work,
            },
        ],
        route: vec![home, work],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::WeatherError;
    use crate::models::{CommuteMode, CommutePreferences};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder {
        places: HashMap<&'static str, Coordinate>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, place_name: &str) -> Result<Coordinate, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.places
                .get(place_name)
                .copied()
                .ok_or_else(|| GeocodeError::NotFound(place_name.to_string()))
        }
    }

    struct DownGeocoder;

    #[async_trait]
    impl Geocoder for DownGeocoder {
        async fn resolve(&self, _place_name: &str) -> Result<Coordinate, GeocodeError> {
            Err(GeocodeError::Unavailable("connection refused".to_string()))
        }
    }

    struct FailingWeather;

    #[async_trait]
    impl WeatherProvider for FailingWeather {
        async fn current(&self) -> Result<WeatherSnapshot, WeatherError> {
            Err(WeatherError::Unavailable("timeout".to_string()))
        }
    }

    struct ClearWeather;

    #[async_trait]
    impl WeatherProvider for ClearWeather {
        async fn current(&self) -> Result<WeatherSnapshot, WeatherError> {
            Ok(WeatherSnapshot::new(WeatherCondition::Clear, 26.0))
        }
    }

    fn geocoder() -> Arc<FixedGeocoder> {
        let mut places = HashMap::new();
        places.insert("MG Road", Coordinate { latitude: 12.9716, longitude: 77.5946 });
        places.insert("Cubbon Park", Coordinate { latitude: 12.9763, longitude: 77.5929 });
        places.insert("Koramangala", Coordinate { latitude: 12.9352, longitude: 77.6146 });
        Arc::new(FixedGeocoder {
            places,
            calls: AtomicUsize::new(0),
        })
    }

    fn roster() -> Arc<Roster> {
        Arc::new(
            Roster::from_toml_str(
                r#"
[[commuters]]
id = 1
home = { latitude = 12.9716, longitude = 77.5946 }
work = { latitude = 12.9352, longitude = 77.6146 }
prefersCarpool = true

[[commuters]]
id = 2
home = { latitude = 12.9352, longitude = 77.6146 }
work = { latitude = 12.9716, longitude = 77.5946 }
prefersCarpool = true
"#,
            )
            .unwrap(),
        )
    }

    fn planner(geocoder: Arc<dyn Geocoder>, weather: Arc<dyn WeatherProvider>) -> CommutePlanner {
        CommutePlanner::new(geocoder, weather, roster(), CarpoolMatcher::default())
    }

    fn walk_and_bike() -> CommutePreferences {
        CommutePreferences {
            prefers_walking: true,
            prefers_biking: true,
            prefers_carpool: false,
        }
    }

    #[tokio::test]
    async fn test_short_clear_trip_walks() {
        let planner = planner(geocoder(), Arc::new(ClearWeather));
        let request = TripRequest::new("MG Road", "Cubbon Park", walk_and_bike());

        let result = planner.plan(&request).await.unwrap();

        assert_eq!(result.mode, CommuteMode::Walking);
        assert!(result.distance_km < 3.0);
        assert!(result.matched_commuter_ids.is_empty());
        assert!(result.cluster_assignments.is_empty());
        assert_eq!(result.map.route, vec![result.home, result.work]);
    }

    #[tokio::test]
    async fn test_weather_failure_uses_fallback() {
        let planner = planner(geocoder(), Arc::new(FailingWeather));
        let request = TripRequest::new("MG Road", "Cubbon Park", walk_and_bike());

        let result = planner.plan(&request).await.unwrap();

        assert_eq!(result.weather, FALLBACK_WEATHER);
        assert_eq!(result.mode, CommuteMode::PublicTransit);
    }

    #[tokio::test]
    async fn test_missing_place_reports_all_names() {
        let geocoder = geocoder();
        let planner = planner(geocoder.clone(), Arc::new(ClearWeather));
        let request = TripRequest::new("Atlantis", "El Dorado", CommutePreferences::default());

        match planner.plan(&request).await {
            Err(PlannerError::LocationNotFound { places }) => {
                assert_eq!(places, vec!["Atlantis".to_string(), "El Dorado".to_string()]);
            }
            other => panic!("expected LocationNotFound, got {:?}", other.map(|r| r.mode)),
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_geocoder_outage_is_upstream_error() {
        let planner = planner(Arc::new(DownGeocoder), Arc::new(ClearWeather));
        let request = TripRequest::new("MG Road", "Koramangala", CommutePreferences::default());

        assert!(matches!(
            planner.plan(&request).await,
            Err(PlannerError::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_carpool_query_never_matches_itself() {
        let planner = planner(geocoder(), Arc::new(ClearWeather));
        let preferences = CommutePreferences {
            prefers_carpool: true,
            ..Default::default()
        };
        let request = TripRequest::new("MG Road", "Koramangala", preferences);

        let result = planner.plan(&request).await.unwrap();

        assert_eq!(result.mode, CommuteMode::Carpool);
        assert!(!result.matched_commuter_ids.contains(&3));
        assert_eq!(result.cluster_assignments.len(), 3);
        assert_eq!(result.cluster_assignments[2].commuter_id, 3);
    }
}
