use thiserror::Error;

use crate::model::{route::RouteId, vehicle::VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Unknown vehicle {0}")]
    VehicleNotFound(VehicleId),

    #[error("Unknown route {0}")]
    RouteNotFound(RouteId),

    #[error("No route in progress")]
    NoRouteInProgress,

    #[error("Route needs at least 2 points, got {points}")]
    RouteTooShort { points: usize },

    #[error("Route has {segments} segments but {levels} traffic levels")]
    TrafficLengthMismatch { segments: usize, levels: usize },

    #[error("Vehicle {0} already exists")]
    DuplicateVehicle(VehicleId),

    #[error("Route {0} already exists")]
    DuplicateRoute(RouteId),

    #[error("Vehicle {0} is not on a route")]
    NoProgress(VehicleId),

    #[error("Invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid speed {0}")]
    InvalidSpeed(f64),

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::VehicleNotFound(_) | SimulationError::RouteNotFound(_) => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::InvalidState,
        }
    }
}
