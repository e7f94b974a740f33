use std::fmt::Display;

use serde::Serialize;

use crate::{
    model::{
        coordinate::Coordinate,
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleStatus},
    },
    simulation::eta::Eta,
};

/// Popup text of a moving vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub route_id: RouteId,
    pub traffic: TrafficLevel,
    pub eta: Eta,
}

impl Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Route: {} • Traffic: {} • ETA: {}",
            self.route_id, self.traffic, self.eta
        )
    }
}

/// Everything a renderer needs to redraw one vehicle marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleFrame {
    pub vehicle_id: VehicleId,
    pub position: Coordinate,

    /// Bearing in degrees towards the end of the current segment.
    pub heading: Option<f64>,
    pub status: VehicleStatus,
    pub status_line: Option<StatusLine>,
}
