use jiff::SignedDuration;

use crate::model::{
    coordinate::Coordinate, progress::Progress, route::Route, traffic::TrafficLevel,
    weather::WeatherModel,
};

/// Speed inputs of a single tick, all multiplied together.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    pub base_speed: f64,
    pub speed_multiplier: f64,
    pub sim_speed: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Moved {
        progress: Progress,
        position: Coordinate,

        /// Traffic on the segment the vehicle was on when the tick started.
        traffic: TrafficLevel,
    },
    Delivered {
        position: Coordinate,
    },
}

/// Advances `progress` along `route` by `elapsed`.
///
/// The fraction grows by `base × multiplier × traffic × (1 / weather) × sim speed
/// × seconds × scale`. When it reaches 1 the vehicle moves to the start of the
/// next segment and any overshoot is dropped, so a vehicle crosses at most one
/// segment boundary per tick. Crossing the end of the last segment delivers.
///
/// Pure: the same inputs always produce the same step.
pub fn advance(
    progress: &Progress,
    route: &Route,
    motion: &Motion,
    elapsed: SignedDuration,
    weather: &dyn WeatherModel,
) -> Step {
    let segment_index = progress.segment_index;
    let Some(traffic) = route.traffic(segment_index) else {
        return Step::Delivered {
            position: *route.last_point(),
        };
    };

    let weather_factor = route.weather_factor(segment_index, weather);
    let seconds = elapsed.as_secs_f64().max(0.0);

    let effective = motion.base_speed
        * motion.speed_multiplier
        * traffic.speed_factor()
        * (1.0 / weather_factor)
        * motion.sim_speed;

    let mut fraction = progress.fraction + effective * seconds * motion.scale;
    let mut next_index = segment_index;

    if fraction >= 1.0 {
        fraction = 0.0;
        next_index = segment_index + 1;

        if next_index >= route.segment_count() {
            return Step::Delivered {
                position: *route.last_point(),
            };
        }
    }

    Step::Moved {
        progress: Progress {
            route_id: progress.route_id.clone(),
            segment_index: next_index,
            fraction,
        },
        position: route.interpolate(next_index, fraction),
        traffic,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{route::RouteId, weather::FixedWeather},
        test_utils,
    };

    use super::*;

    const MOTION: Motion = Motion {
        base_speed: 0.0007,
        speed_multiplier: 1.0,
        sim_speed: 1.0,
        scale: 45.0,
    };

    fn progress(segment_index: usize, fraction: f64) -> Progress {
        Progress {
            route_id: RouteId::from("R-1"),
            segment_index,
            fraction,
        }
    }

    #[test]
    fn test_advance_within_segment() {
        let route = test_utils::create_clear_route("R-1", &[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]]);

        let step = advance(
            &progress(0, 0.0),
            &route,
            &MOTION,
            SignedDuration::from_secs(10),
            &FixedWeather(1.0),
        );

        let Step::Moved {
            progress,
            position,
            traffic,
        } = step
        else {
            panic!("expected vehicle to move");
        };

        let expected = 0.0007 * 10.0 * 45.0;
        assert_eq!(progress.segment_index, 0);
        assert!((progress.fraction - expected).abs() < 1e-12);
        assert!((position.lon() - expected).abs() < 1e-12);
        assert_eq!(position.lat(), 0.0);
        assert_eq!(traffic, TrafficLevel::Clear);
    }

    #[test]
    fn test_traffic_and_weather_slow_down() {
        let route = test_utils::create_route(
            "R-1",
            &[[0.0, 0.0], [0.0, 1.0]],
            &[TrafficLevel::Heavy],
        );

        let Step::Moved { progress, .. } = advance(
            &progress(0, 0.1),
            &route,
            &MOTION,
            SignedDuration::from_secs(2),
            &FixedWeather(1.45),
        ) else {
            panic!("expected vehicle to move");
        };

        let expected = 0.1 + 0.0007 * 0.35 / 1.45 * 2.0 * 45.0;
        assert!((progress.fraction - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fraction_strictly_increases() {
        let route = test_utils::create_route(
            "R-1",
            &[[0.0, 0.0], [0.0, 1.0]],
            &[TrafficLevel::Moderate],
        );
        let mut current = progress(0, 0.0);

        for _ in 0..20 {
            let Step::Moved { progress, .. } = advance(
                &current,
                &route,
                &MOTION,
                SignedDuration::from_millis(16),
                &FixedWeather(1.18),
            ) else {
                panic!("expected vehicle to move");
            };

            assert!(progress.fraction > current.fraction);
            assert!(progress.fraction < 1.0);
            current = progress;
        }
    }

    #[test]
    fn test_crossing_resets_fraction_and_advances_one_segment() {
        let route = test_utils::create_clear_route(
            "R-1",
            &[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0], [0.0, 3.0]],
        );

        // Enough elapsed time to cross several segments.
        let Step::Moved {
            progress,
            position,
            ..
        } = advance(
            &progress(0, 0.9),
            &route,
            &MOTION,
            SignedDuration::from_secs(600),
            &FixedWeather(1.0),
        )
        else {
            panic!("expected vehicle to move");
        };

        assert_eq!(progress.segment_index, 1);
        assert_eq!(progress.fraction, 0.0);
        assert_eq!(position, route.points()[1]);
    }

    #[test]
    fn test_crossing_last_segment_delivers() {
        let route = test_utils::create_clear_route("R-1", &[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]]);

        let step = advance(
            &progress(1, 0.99),
            &route,
            &MOTION,
            SignedDuration::from_secs(5),
            &FixedWeather(1.0),
        );

        assert_eq!(
            step,
            Step::Delivered {
                position: *route.last_point()
            }
        );
    }

    #[test]
    fn test_no_movement_without_elapsed_time() {
        let route = test_utils::create_clear_route("R-1", &[[0.0, 0.0], [0.0, 1.0]]);

        for elapsed in [SignedDuration::ZERO, SignedDuration::from_secs(-3)] {
            let Step::Moved { progress, .. } = advance(
                &progress(0, 0.5),
                &route,
                &MOTION,
                elapsed,
                &FixedWeather(1.0),
            ) else {
                panic!("expected vehicle to stay");
            };

            assert_eq!(progress.fraction, 0.5);
        }
    }

    #[test]
    fn test_advance_is_deterministic() {
        let route = test_utils::create_route(
            "R-1",
            &[[19.0760, 72.8777], [18.5204, 73.8567]],
            &[TrafficLevel::Moderate],
        );
        let weather = crate::model::weather::HashedWeather;

        let first = advance(
            &progress(0, 0.2),
            &route,
            &MOTION,
            SignedDuration::from_millis(33),
            &weather,
        );
        let second = advance(
            &progress(0, 0.2),
            &route,
            &MOTION,
            SignedDuration::from_millis(33),
            &weather,
        );

        assert_eq!(first, second);
    }
}
