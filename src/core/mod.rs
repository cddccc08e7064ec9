// Core algorithm exports
pub mod distance;
pub mod kmeans;
pub mod matcher;
pub mod mode;
pub mod planner;
pub mod providers;

pub use distance::{geodesic_distance_km, midpoint};
pub use kmeans::{ClusterFit, ClusteringError, KMeans};
pub use matcher::{CarpoolMatcher, CarpoolMatches, MatchError, CARPOOL_CLUSTERS};
pub use mode::select_mode;
pub use planner::{CommutePlanner, PlannerError, FALLBACK_WEATHER};
pub use providers::{GeocodeError, Geocoder, WeatherError, WeatherProvider};
