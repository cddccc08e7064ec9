use serde::{Deserialize, Serialize};
use crate::models::domain::{ClusterAssignment, CommuteMode, Commuter, Coordinate, WeatherSnapshot};

/// City-scale zoom for the route map
pub const DEFAULT_MAP_ZOOM: u8 = 13;

/// Everything a client needs to draw the route map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    /// Straight line from home to work (no routing)
    pub route: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub label: String,
    pub position: Coordinate,
}

/// Result of planning a single commute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripResult {
    #[serde(rename = "requestId")]
    pub request_id: uuid::Uuid,
    pub home: Coordinate,
    pub work: Coordinate,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub weather: WeatherSnapshot,
    pub mode: CommuteMode,
    #[serde(rename = "modeLabel")]
    pub mode_label: String,
    #[serde(rename = "emissionsSavedKg")]
    pub emissions_saved_kg: f64,
    #[serde(rename = "matchedCommuterIds")]
    pub matched_commuter_ids: Vec<u32>,
    #[serde(rename = "carpoolMatches")]
    pub carpool_matches: Vec<Commuter>,
    #[serde(rename = "clusterAssignments")]
    pub cluster_assignments: Vec<ClusterAssignment>,
    pub map: MapView,
}

/// Response listing the reference roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    pub commuters: Vec<Commuter>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "rosterSize")]
    pub roster_size: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
