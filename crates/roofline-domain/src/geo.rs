//! Great-circle distance for the near-me filter.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default near-me search radius.
pub const DEFAULT_NEAR_ME_RADIUS_KM: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in [-90, 90], longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Haversine distance between two points in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Keep the items within `radius_km` of `origin`, nearest first.
///
/// Items without coordinates are dropped. Linear in the number of items.
pub fn within_radius<T>(
    items: Vec<T>,
    origin: GeoPoint,
    radius_km: f64,
    point_of: impl Fn(&T) -> Option<GeoPoint>,
) -> Vec<(T, f64)> {
    let mut hits: Vec<(T, f64)> = items
        .into_iter()
        .filter_map(|item| {
            let distance = haversine_km(origin, point_of(&item)?);
            (distance <= radius_km).then_some((item, distance))
        })
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1));
    hits
}
