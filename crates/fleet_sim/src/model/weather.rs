use crate::model::coordinate::Coordinate;

/// Produces the travel-time multiplier for a segment. Must be a pure function
/// of the segment endpoints so ETA estimates stay reproducible.
pub trait WeatherModel {
    fn delay_factor(&self, from: &Coordinate, to: &Coordinate) -> f64;
}

/// Stable pseudo-random weather derived from the segment midpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedWeather;

impl WeatherModel for HashedWeather {
    fn delay_factor(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        hashed_delay_factor(from, to)
    }
}

/// Same factor everywhere.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub f64);

impl WeatherModel for FixedWeather {
    fn delay_factor(&self, _from: &Coordinate, _to: &Coordinate) -> f64 {
        self.0
    }
}

pub const CLEAR_SKIES: f64 = 1.0;
pub const RAIN: f64 = 1.18;
pub const STORM: f64 = 1.45;

pub fn hashed_delay_factor(from: &Coordinate, to: &Coordinate) -> f64 {
    let mid = from.midpoint(to);
    let v = ((mid.lat() * 12.9898 + mid.lon() * 78.233).sin() * 43758.5453).abs() % 1.0;

    if v < 0.60 {
        CLEAR_SKIES
    } else if v < 0.86 {
        RAIN
    } else {
        STORM
    }
}
