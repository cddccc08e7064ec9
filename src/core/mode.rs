use crate::models::{CommuteMode, CommutePreferences, ModeDecision, WeatherSnapshot};

/// Walking is only considered strictly below this distance
pub const WALKING_MAX_DISTANCE_KM: f64 = 3.0;
/// Walking is only considered strictly below this temperature
pub const WALKING_MAX_TEMPERATURE_C: f64 = 30.0;
/// Biking is only considered strictly below this distance
pub const BIKING_MAX_DISTANCE_KM: f64 = 8.0;

/// Pick a commute mode and estimate the CO2 it saves
///
/// Rules are evaluated in order and the first match wins:
/// 1. Walking: preferred, clear sky, below 30°C, under 3 km
/// 2. Biking: preferred, clear sky, under 8 km
/// 3. Carpool: preferred
/// 4. Public transit otherwise
///
/// Emissions saved are `distance_km * mode.emission_factor()`.
pub fn select_mode(
    preferences: &CommutePreferences,
    weather: &WeatherSnapshot,
    distance_km: f64,
) -> ModeDecision {
    let distance_km = distance_km.max(0.0);

    let mode = if preferences.prefers_walking
        && weather.is_clear()
        && weather.temperature_c < WALKING_MAX_TEMPERATURE_C
        && distance_km < WALKING_MAX_DISTANCE_KM
    {
        CommuteMode::Walking
    } else if preferences.prefers_biking
        && weather.is_clear()
        && distance_km < BIKING_MAX_DISTANCE_KM
    {
        CommuteMode::Biking
    } else if preferences.prefers_carpool {
        CommuteMode::Carpool
    } else {
        CommuteMode::PublicTransit
    };

    ModeDecision {
        mode,
        emissions_saved_kg: distance_km * mode.emission_factor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;

    fn prefs(walk: bool, bike: bool, carpool: bool) -> CommutePreferences {
        CommutePreferences {
            prefers_biking: bike,
            prefers_walking: walk,
            prefers_carpool: carpool,
        }
    }

    fn clear(temperature_c: f64) -> WeatherSnapshot {
        WeatherSnapshot::new(WeatherCondition::Clear, temperature_c)
    }

    #[test]
    fn test_walking_beats_biking() {
        let decision = select_mode(&prefs(true, true, false), &clear(20.0), 2.0);
        assert_eq!(decision.mode, CommuteMode::Walking);
        assert!((decision.emissions_saved_kg - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_hot_weather_rules_out_walking() {
        let decision = select_mode(&prefs(true, true, false), &clear(30.0), 2.0);
        assert_eq!(decision.mode, CommuteMode::Biking);
    }

    #[test]
    fn test_walking_distance_is_exclusive() {
        let decision = select_mode(&prefs(true, false, false), &clear(20.0), 3.0);
        assert_eq!(decision.mode, CommuteMode::PublicTransit);
    }

    #[test]
    fn test_rain_falls_through_to_carpool() {
        let rain = WeatherSnapshot::new(WeatherCondition::Rain, 20.0);
        let decision = select_mode(&prefs(true, true, true), &rain, 1.0);
        assert_eq!(decision.mode, CommuteMode::Carpool);
        assert!((decision.emissions_saved_kg - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_long_bike_ride_falls_through() {
        let decision = select_mode(&prefs(false, true, false), &clear(20.0), 8.0);
        assert_eq!(decision.mode, CommuteMode::PublicTransit);
        assert!((decision.emissions_saved_kg - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_distance_never_yields_negative_emissions() {
        let decision = select_mode(&prefs(false, false, false), &clear(20.0), -5.0);
        assert_eq!(decision.emissions_saved_kg, 0.0);
    }
}
