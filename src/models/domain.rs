use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Returned when a latitude/longitude pair is out of range or not finite
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude})")]
pub struct InvalidCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside [-90, 90] x [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let coordinate = Self { latitude, longitude };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(InvalidCoordinate { latitude, longitude })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// The three independent commute preference flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommutePreferences {
    #[serde(default)]
    pub prefers_biking: bool,
    #[serde(default)]
    pub prefers_walking: bool,
    #[serde(default)]
    pub prefers_carpool: bool,
}

/// A commuter with an origin-destination pair and preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commuter {
    pub id: u32,
    pub home: Coordinate,
    pub work: Coordinate,
    #[serde(flatten)]
    pub preferences: CommutePreferences,
}

impl Commuter {
    /// Feature vector used for carpool clustering: (home_lat, home_lon, work_lat, work_lon)
    #[inline]
    pub fn features(&self) -> [f64; 4] {
        [
            self.home.latitude,
            self.home.longitude,
            self.work.latitude,
            self.work.longitude,
        ]
    }

    pub fn prefers_carpool(&self) -> bool {
        self.preferences.prefers_carpool
    }
}

/// Recommended commute mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommuteMode {
    Walking,
    Biking,
    Carpool,
    PublicTransit,
}

impl CommuteMode {
    pub const ALL: [CommuteMode; 4] = [
        CommuteMode::Walking,
        CommuteMode::Biking,
        CommuteMode::Carpool,
        CommuteMode::PublicTransit,
    ];

    /// kg CO2 saved per km relative to driving alone
    pub const fn emission_factor(self) -> f64 {
        match self {
            CommuteMode::Walking | CommuteMode::Biking => 0.21,
            CommuteMode::Carpool => 0.1,
            CommuteMode::PublicTransit => 0.15,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CommuteMode::Walking => "Walking",
            CommuteMode::Biking => "Biking",
            CommuteMode::Carpool => "Carpool",
            CommuteMode::PublicTransit => "Public Transit",
        }
    }
}

impl fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse weather condition label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Unknown,
}

impl WeatherCondition {
    /// Parse a provider label, case-insensitively. Unrecognised labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "clear" => WeatherCondition::Clear,
            "clouds" | "cloudy" => WeatherCondition::Clouds,
            "rain" => WeatherCondition::Rain,
            "drizzle" => WeatherCondition::Drizzle,
            "thunderstorm" => WeatherCondition::Thunderstorm,
            "snow" => WeatherCondition::Snow,
            "mist" | "fog" | "haze" => WeatherCondition::Mist,
            _ => WeatherCondition::Unknown,
        }
    }
}

/// Current weather as seen by the mode selector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    pub temperature_c: f64,
}

impl WeatherSnapshot {
    pub fn new(condition: WeatherCondition, temperature_c: f64) -> Self {
        Self { condition, temperature_c }
    }

    pub fn is_clear(&self) -> bool {
        self.condition == WeatherCondition::Clear
    }
}

/// Outcome of the mode selection policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeDecision {
    pub mode: CommuteMode,
    pub emissions_saved_kg: f64,
}

/// Cluster label of one commuter for a single matching computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAssignment {
    pub commuter_id: u32,
    pub cluster: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_range_checks() {
        assert!(Coordinate::new(12.9716, 77.5946).is_ok());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_weather_condition_labels() {
        assert_eq!(WeatherCondition::from_label("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_label(" rain "), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_label("volcanic ash"), WeatherCondition::Unknown);
    }

    #[test]
    fn test_commuter_flattened_preferences() {
        let json = r#"{
            "id": 7,
            "home": {"latitude": 12.97, "longitude": 77.59},
            "work": {"latitude": 12.93, "longitude": 77.61},
            "prefersCarpool": true
        }"#;
        let commuter: Commuter = serde_json::from_str(json).unwrap();

        assert_eq!(commuter.id, 7);
        assert!(commuter.prefers_carpool());
        assert!(!commuter.preferences.prefers_biking);
        assert_eq!(commuter.features(), [12.97, 77.59, 12.93, 77.61]);
    }
}
