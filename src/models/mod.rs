// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod roster;

pub use domain::{ClusterAssignment, CommuteMode, CommutePreferences, Commuter, Coordinate, InvalidCoordinate, ModeDecision, WeatherCondition, WeatherSnapshot};
pub use requests::TripRequest;
pub use responses::{ErrorResponse, HealthResponse, MapMarker, MapView, RosterResponse, TripResult, DEFAULT_MAP_ZOOM};
pub use roster::{Roster, RosterError, MIN_ROSTER_SIZE};
