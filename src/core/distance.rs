use crate::models::Coordinate;
use geo::{GeodesicDistance, Point};

/// Geodesic distance between two coordinates in kilometers, rounded to 2 decimals
///
/// Uses Karney's algorithm on the WGS84 ellipsoid, which stays accurate at
/// city scale where a flat projection would not.
///
/// # Arguments
/// * `from` - Start coordinate
/// * `to` - End coordinate
///
/// # Returns
/// Non-negative distance in kilometers
#[inline]
pub fn geodesic_distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let meters = to_point(from).geodesic_distance(&to_point(to));
    round_to_hundredths(meters / 1000.0).max(0.0)
}

/// Arithmetic midpoint of two coordinates, used to center the route map
pub fn midpoint(a: &Coordinate, b: &Coordinate) -> Coordinate {
    Coordinate {
        latitude: (a.latitude + b.latitude) / 2.0,
        longitude: (a.longitude + b.longitude) / 2.0,
    }
}

#[inline]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// geo points are (x = longitude, y = latitude)
#[inline]
fn to_point(coordinate: &Coordinate) -> Point<f64> {
    Point::new(coordinate.longitude, coordinate.latitude)
}
