use geo::{Bearing, Haversine};
use serde::Serialize;

use crate::{error::SimulationError, model::kilometers::Kilometers};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position. Stored as a `geo::Point` with `x = lon` and `y = lat`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    point: geo::Point,
}

impl Coordinate {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self {
            point: geo::Point::new(lon, lat),
        }
    }

    /// Same as [`Coordinate::from_lat_lon`] but rejects non finite values and
    /// positions outside of the valid latitude/longitude ranges.
    pub fn try_from_lat_lon(lat: f64, lon: f64) -> Result<Self, SimulationError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        if valid {
            Ok(Self::from_lat_lon(lat, lon))
        } else {
            Err(SimulationError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn to_lat_lon(&self) -> [f64; 2] {
        [self.lat(), self.lon()]
    }

    /// Great-circle distance on a spherical earth of radius [`EARTH_RADIUS_KM`].
    pub fn haversine_distance(&self, to: &Coordinate) -> Kilometers {
        let d_lat = (to.lat() - self.lat()).to_radians();
        let d_lon = (to.lon() - self.lon()).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat().to_radians().cos()
                * to.lat().to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        Kilometers::new(EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
    }

    /// Linear interpolation in lat/lon space, `t = 0` is `self`, `t = 1` is `to`.
    pub fn lerp(&self, to: &Coordinate, t: f64) -> Coordinate {
        Coordinate::from_lat_lon(
            self.lat() + (to.lat() - self.lat()) * t,
            self.lon() + (to.lon() - self.lon()) * t,
        )
    }

    pub fn midpoint(&self, to: &Coordinate) -> Coordinate {
        Coordinate::from_lat_lon((self.lat() + to.lat()) / 2.0, (self.lon() + to.lon()) / 2.0)
    }

    pub fn bearing(&self, dest: &Coordinate) -> f64 {
        let haversine = Haversine;
        haversine.bearing(self.point, dest.point)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Coordinate::from_lat_lon(lat, lon)
    }
}

impl From<&Coordinate> for geo::Point<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        coordinate.point
    }
}

#[cfg(test)]
mod tests {
    use geo::{Distance, Haversine};

    use super::*;

    #[test]
    fn test_haversine_one_degree_of_longitude_at_equator() {
        let a = Coordinate::from_lat_lon(0.0, 0.0);
        let b = Coordinate::from_lat_lon(0.0, 1.0);

        let distance = a.haversine_distance(&b).value();
        assert!((distance - 111.1949).abs() < 1e-3, "{distance}");
    }

    #[test]
    fn test_haversine_matches_geo_within_radius_difference() {
        let mumbai = Coordinate::from_lat_lon(19.0760, 72.8777);
        let pune = Coordinate::from_lat_lon(18.5204, 73.8567);

        let ours = mumbai.haversine_distance(&pune).value();
        let geo_km = Haversine.distance(geo::Point::from(&mumbai), geo::Point::from(&pune)) / 1000.0;

        assert!((ours - geo_km).abs() / geo_km < 1e-5);
        assert!((ours - 120.152).abs() < 1e-2);
    }

    #[test]
    fn test_haversine_is_zero_for_same_point() {
        let a = Coordinate::from_lat_lon(12.9716, 77.5946);
        assert_eq!(a.haversine_distance(&a).value(), 0.0);
    }

    #[test]
    fn test_lerp() {
        let a = Coordinate::from_lat_lon(0.0, 0.0);
        let b = Coordinate::from_lat_lon(10.0, 20.0);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 0.25).to_lat_lon(), [2.5, 5.0]);
        assert_eq!(a.midpoint(&b).to_lat_lon(), [5.0, 10.0]);
    }

    #[test]
    fn test_bearing_due_east() {
        let a = Coordinate::from_lat_lon(0.0, 0.0);
        let b = Coordinate::from_lat_lon(0.0, 1.0);

        assert!((a.bearing(&b) - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_try_from_lat_lon_rejects_invalid() {
        assert!(Coordinate::try_from_lat_lon(91.0, 0.0).is_err());
        assert!(Coordinate::try_from_lat_lon(0.0, -181.0).is_err());
        assert!(Coordinate::try_from_lat_lon(f64::NAN, 0.0).is_err());
        assert!(Coordinate::try_from_lat_lon(-90.0, 180.0).is_ok());
    }
}
