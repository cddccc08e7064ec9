//! Commute Planner - sustainable commute recommendations and carpool matching
//!
//! This library provides the decision and matching engine: a fixed-priority
//! mode selection policy, geodesic trip distances, and seeded k-means
//! clustering of commuter origin-destination pairs for carpool suggestions.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CarpoolMatcher, CommutePlanner, KMeans, PlannerError, geodesic_distance_km, select_mode};
pub use models::{CommuteMode, CommutePreferences, Commuter, Coordinate, Roster, TripRequest, TripResult, WeatherCondition, WeatherSnapshot};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let here = Coordinate { latitude: 12.9716, longitude: 77.5946 };
        assert_eq!(geodesic_distance_km(&here, &here), 0.0);
    }
}
