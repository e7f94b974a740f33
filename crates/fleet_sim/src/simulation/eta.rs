use std::fmt::Display;

use serde::Serialize;

use crate::model::{kilometers::Kilometers, route::Route, weather::WeatherModel};

pub const BASE_KM_PER_MINUTE: f64 = 30.0 / 60.0;

/// Estimated remaining travel time, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Eta(u32);

impl Eta {
    pub const ZERO: Eta = Eta(0);

    pub fn from_minutes(minutes: u32) -> Self {
        Eta(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl Display for Eta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EtaEstimator {
    base_km_per_minute: f64,
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self::new(BASE_KM_PER_MINUTE)
    }
}

impl EtaEstimator {
    pub fn new(base_km_per_minute: f64) -> Self {
        Self { base_km_per_minute }
    }

    /// Remaining time from `fraction` of segment `segment_index` to the end of
    /// `route`.
    ///
    /// Traffic and weather are folded into running averages that start at 1.0
    /// and halve towards each segment's factor in route order, so the segments
    /// closest to the vehicle dominate the estimate.
    pub fn estimate(
        &self,
        route: &Route,
        segment_index: usize,
        fraction: f64,
        weather: &dyn WeatherModel,
    ) -> Eta {
        let distance = remaining_distance(route, segment_index, fraction);
        if distance.is_zero() {
            return Eta::ZERO;
        }

        let mut traffic_avg = 1.0;
        let mut weather_avg = 1.0;

        for index in segment_index..route.segment_count() {
            if let Some(level) = route.traffic(index) {
                traffic_avg = (traffic_avg + level.eta_factor()) / 2.0;
            }
            weather_avg = (weather_avg + route.weather_factor(index, weather)) / 2.0;
        }

        let minutes =
            (distance.value() / (self.base_km_per_minute * traffic_avg) * weather_avg).round();

        if minutes.is_finite() && minutes > 0.0 {
            Eta(minutes.min(f64::from(u32::MAX)) as u32)
        } else {
            Eta::ZERO
        }
    }
}

/// Great-circle distance left on the route: the unfinished part of the current
/// segment plus every later segment.
pub fn remaining_distance(route: &Route, segment_index: usize, fraction: f64) -> Kilometers {
    let fraction = fraction.clamp(0.0, 1.0);

    (segment_index..route.segment_count())
        .map(|index| {
            let length = route.segment_length(index);
            if index == segment_index {
                length * (1.0 - fraction)
            } else {
                length
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            traffic::TrafficLevel,
            weather::{FixedWeather, HashedWeather},
        },
        test_utils,
    };

    use super::*;

    const POINTS: [[f64; 2]; 3] = [[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]];

    #[test]
    fn test_all_clear_route() {
        let route = test_utils::create_clear_route("R-1", &POINTS);

        let eta = EtaEstimator::default().estimate(&route, 0, 0.0, &FixedWeather(1.0));

        assert_eq!(eta.minutes(), 445);
        assert_eq!(eta.to_string(), "445 min");
    }

    #[test]
    fn test_heavy_first_segment() {
        let route = test_utils::create_route(
            "R-1",
            &POINTS,
            &[TrafficLevel::Heavy, TrafficLevel::Clear],
        );

        let eta = EtaEstimator::default().estimate(&route, 0, 0.0, &FixedWeather(1.0));

        let traffic_avg: f64 = ((1.0 + 0.45) / 2.0 + 1.0) / 2.0;
        assert!((traffic_avg - 0.8625).abs() < 1e-12);

        let expected = (route.length().value() / (0.5 * traffic_avg)).round() as u32;
        assert_eq!(eta.minutes(), expected);
        assert_eq!(eta.minutes(), 516);
    }

    #[test]
    fn test_hashed_weather_contributes() {
        let route = test_utils::create_clear_route("R-1", &POINTS);

        // Weather is 1.18 on the first segment and 1.0 on the second.
        let eta = EtaEstimator::default().estimate(&route, 0, 0.0, &HashedWeather);

        assert_eq!(eta.minutes(), 465);
    }

    #[test]
    fn test_partial_segment() {
        let route = test_utils::create_clear_route("R-1", &POINTS);

        let halfway = EtaEstimator::default().estimate(&route, 1, 0.5, &FixedWeather(1.0));

        // Half of 111.19 km at 0.5 km/min, with the traffic average of a single clear segment.
        assert_eq!(halfway.minutes(), 111);
    }

    #[test]
    fn test_idempotent() {
        let route = test_utils::create_route(
            "R-1",
            &POINTS,
            &[TrafficLevel::Moderate, TrafficLevel::Heavy],
        );
        let estimator = EtaEstimator::default();

        let first = estimator.estimate(&route, 0, 0.3, &HashedWeather);
        let second = estimator.estimate(&route, 0, 0.3, &HashedWeather);

        assert_eq!(first, second);
    }

    #[test]
    fn test_past_the_end_is_zero() {
        let route = test_utils::create_clear_route("R-1", &POINTS);

        let estimator = EtaEstimator::default();
        assert_eq!(estimator.estimate(&route, 2, 0.0, &HashedWeather), Eta::ZERO);
        assert_eq!(estimator.estimate(&route, 1, 1.0, &HashedWeather), Eta::ZERO);
    }

    #[test]
    fn test_remaining_distance() {
        let route = test_utils::create_clear_route("R-1", &POINTS);

        let full = remaining_distance(&route, 0, 0.0).value();
        let quarter_in = remaining_distance(&route, 0, 0.25).value();

        assert!((full - 222.3899).abs() < 1e-3);
        assert!((full - quarter_in - 111.1949 * 0.25).abs() < 1e-3);
    }
}
