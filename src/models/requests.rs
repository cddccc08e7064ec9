use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::CommutePreferences;

/// Request to plan a commute
///
/// Captured once per submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TripRequest {
    #[validate(custom(function = "validate_place_name"))]
    #[serde(alias = "home_place", rename = "homePlace")]
    pub home_place: String,
    #[validate(custom(function = "validate_place_name"))]
    #[serde(alias = "work_place", rename = "workPlace")]
    pub work_place: String,
    #[serde(alias = "prefers_biking", rename = "prefersBiking", default)]
    pub prefers_biking: bool,
    #[serde(alias = "prefers_walking", rename = "prefersWalking", default)]
    pub prefers_walking: bool,
    #[serde(alias = "prefers_carpool", rename = "prefersCarpool", default)]
    pub prefers_carpool: bool,
}

impl TripRequest {
    pub fn new(home_place: impl Into<String>, work_place: impl Into<String>, preferences: CommutePreferences) -> Self {
        Self {
            home_place: home_place.into(),
            work_place: work_place.into(),
            prefers_biking: preferences.prefers_biking,
            prefers_walking: preferences.prefers_walking,
            prefers_carpool: preferences.prefers_carpool,
        }
    }

    pub fn preferences(&self) -> CommutePreferences {
        CommutePreferences {
            prefers_biking: self.prefers_biking,
            prefers_walking: self.prefers_walking,
            prefers_carpool: self.prefers_carpool,
        }
    }
}

/// Maximum place name length in characters, after trimming
pub const MAX_PLACE_NAME_CHARS: usize = 256;

fn validate_place_name(value: &str) -> Result<(), validator::ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    if trimmed.chars().count() > MAX_PLACE_NAME_CHARS {
        return Err(validator::ValidationError::new("too_long"));
    }
    Ok(())
}
