use geo_types::{Coord, Point};

/// Trait for types that carry a WGS84 latitude/longitude.
///
/// Implemented for `(lat, lon)` tuples, `geo_types::Point<f64>` and
/// `geo_types::Coord<f64>` (both `x = lon`, `y = lat`), and for references to
/// any implementor, so proximity tests accept owned points and borrowed
/// band-filtered views alike.
pub trait Coordinate {
    /// Returns the latitude in degrees.
    fn lat(&self) -> f64;
    /// Returns the longitude in degrees.
    fn lon(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lat(&self) -> f64 {
        self.0
    }
    fn lon(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn lat(&self) -> f64 {
        self.y()
    }
    fn lon(&self) -> f64 {
        self.x()
    }
}

impl Coordinate for Coord<f64> {
    fn lat(&self) -> f64 {
        self.y
    }
    fn lon(&self) -> f64 {
        self.x
    }
}

impl<T: Coordinate + ?Sized> Coordinate for &T {
    fn lat(&self) -> f64 {
        (**self).lat()
    }
    fn lon(&self) -> f64 {
        (**self).lon()
    }
}

/// True when both values are finite and inside the WGS84 ranges.
pub fn is_valid_lat_lon(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
