// A geographic point, latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const DEGREES_TO_RADIANS: f64 = std::f64::consts::PI / 180.0;

// Spherical law of cosines. acos is undefined just past +-1 due to floating-point
// error, which the from == to short-circuit below avoids for the zero-distance case.
// Other near-antipodal or near-identical inputs are clamped.
pub fn compute_distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }
    let lat1 = from.lat * DEGREES_TO_RADIANS;
    let lat2 = to.lat * DEGREES_TO_RADIANS;
    let dlon = (from.lon - to.lon).abs() * DEGREES_TO_RADIANS;

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_METERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let a = Coordinates::new(55.611087, 37.208290);
        assert_eq!(compute_distance(a, a), 0.0);
    }

    #[test]
    fn moscow_stops_are_a_few_km_apart() {
        let a = Coordinates::new(55.611087, 37.208290);
        let b = Coordinates::new(55.595884, 37.209755);
        let distance = compute_distance(a, b);
        assert!((distance - 1693.0).abs() < 5.0, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(55.611087, 37.208290);
        let b = Coordinates::new(55.595884, 37.209755);
        assert_eq!(compute_distance(a, b), compute_distance(b, a));
    }
}
