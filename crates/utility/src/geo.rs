pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const METERS_PER_KM: f64 = 1000.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in kilometers between two `(latitude, longitude)`
/// pairs given in degrees.
pub fn haversine_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (to_radians(from.0), to_radians(from.1));
    let (lat2, lon2) = (to_radians(to.0), to_radians(to.1));

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    // rounding can push `a` past 1 for near-antipodal points
    let a = ((dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / METERS_PER_KM
}

/// Whether both values are plausible WGS84 degrees.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
