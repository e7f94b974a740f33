use crate::{
    define_id_newtype,
    error::SimulationError,
    model::{
        coordinate::Coordinate, kilometers::Kilometers, traffic::TrafficLevel,
        weather::WeatherModel,
    },
};

define_id_newtype!(RouteId);

#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    points: Vec<Coordinate>,

    // segment_traffic[i] is the traffic between points[i] and points[i + 1]
    segment_traffic: Vec<TrafficLevel>,
}

impl Route {
    pub fn new(
        id: RouteId,
        points: Vec<Coordinate>,
        segment_traffic: Vec<TrafficLevel>,
    ) -> Result<Self, SimulationError> {
        if points.len() < 2 {
            return Err(SimulationError::RouteTooShort {
                points: points.len(),
            });
        }

        if segment_traffic.len() != points.len() - 1 {
            return Err(SimulationError::TrafficLengthMismatch {
                segments: points.len() - 1,
                levels: segment_traffic.len(),
            });
        }

        Ok(Route {
            id,
            points,
            segment_traffic,
        })
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.segment_traffic.len()
    }

    pub fn first_point(&self) -> &Coordinate {
        &self.points[0]
    }

    pub fn last_point(&self) -> &Coordinate {
        &self.points[self.points.len() - 1]
    }

    pub fn segment_traffic(&self) -> &[TrafficLevel] {
        &self.segment_traffic
    }

    pub fn traffic(&self, segment_index: usize) -> Option<TrafficLevel> {
        self.segment_traffic.get(segment_index).copied()
    }

    /// Replaces the level of an existing segment. Out of range indices are ignored.
    pub(crate) fn set_traffic(&mut self, segment_index: usize, level: TrafficLevel) {
        if let Some(slot) = self.segment_traffic.get_mut(segment_index) {
            *slot = level;
        }
    }

    pub fn segment(&self, segment_index: usize) -> Option<(&Coordinate, &Coordinate)> {
        if segment_index >= self.segment_count() {
            return None;
        }

        Some((&self.points[segment_index], &self.points[segment_index + 1]))
    }

    pub fn segment_length(&self, segment_index: usize) -> Kilometers {
        self.segment(segment_index)
            .map(|(from, to)| from.haversine_distance(to))
            .unwrap_or(Kilometers::ZERO)
    }

    pub fn length(&self) -> Kilometers {
        (0..self.segment_count())
            .map(|index| self.segment_length(index))
            .sum()
    }

    pub fn weather_factor(&self, segment_index: usize, weather: &dyn WeatherModel) -> f64 {
        self.segment(segment_index)
            .map(|(from, to)| weather.delay_factor(from, to))
            .unwrap_or(1.0)
    }

    /// Position at `fraction` along the segment. Indices past the end clamp to
    /// the last point.
    pub fn interpolate(&self, segment_index: usize, fraction: f64) -> Coordinate {
        match self.segment(segment_index) {
            Some((from, to)) => from.lerp(to, fraction),
            None => *self.last_point(),
        }
    }
}
