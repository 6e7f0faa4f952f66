//! Great-circle distance between position samples.

use crate::model::journey::Coordinates;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Haversine distance in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    let distance = EARTH_RADIUS_KM * c;

    if distance.is_finite() {
        distance
    } else {
        0.0
    }
}

/// Rounds a distance to two decimals for display and storage.
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
