use serde::Serialize;

use crate::model::route::RouteId;

/// Where a vehicle is along its route: the current segment and how far into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub route_id: RouteId,
    pub segment_index: usize,

    /// Position within the current segment, always in `[0, 1)`.
    pub fraction: f64,
}

impl Progress {
    pub fn start(route_id: RouteId) -> Self {
        Self {
            route_id,
            segment_index: 0,
            fraction: 0.0,
        }
    }
}
