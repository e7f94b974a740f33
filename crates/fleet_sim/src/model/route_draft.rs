use crate::model::{coordinate::Coordinate, route::RouteId};

/// A route being drawn point by point. Becomes a [`crate::model::route::Route`]
/// once finalized with traffic.
#[derive(Debug, Clone)]
pub struct RouteDraft {
    id: RouteId,
    points: Vec<Coordinate>,
}

impl RouteDraft {
    pub fn new(id: RouteId) -> Self {
        Self {
            id,
            points: Vec::new(),
        }
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    pub fn into_parts(self) -> (RouteId, Vec<Coordinate>) {
        (self.id, self.points)
    }
}
