use std::fmt::Display;

use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    define_id_newtype,
    model::{
        coordinate::Coordinate,
        progress::Progress,
        route::{Route, RouteId},
    },
};

define_id_newtype!(VehicleId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    /// Ground vehicle.
    #[default]
    Truck,
    /// Aerial vehicle, faster than a truck.
    Drone,
}

impl Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                VehicleKind::Truck => "truck",
                VehicleKind::Drone => "drone",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VehicleStatus {
    Idle,
    Assigned,
    InTransit,
    Delivered,
}

impl Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                VehicleStatus::Idle => "Idle",
                VehicleStatus::Assigned => "Assigned",
                VehicleStatus::InTransit => "In Transit",
                VehicleStatus::Delivered => "Delivered",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VehicleState {
    Idle,
    Assigned(Progress),
    InTransit(Progress),
    /// Arrived at the end of its route, goes back to idle at `idle_at`.
    Delivered {
        idle_at: SignedDuration,
    },
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    kind: VehicleKind,
    position: Coordinate,
    state: VehicleState,
    speed_multiplier: f64,
    last_updated: SignedDuration,
}

impl Vehicle {
    pub fn new(id: VehicleId, kind: VehicleKind, position: Coordinate, now: SignedDuration) -> Self {
        Self {
            id,
            kind,
            position,
            state: VehicleState::Idle,
            speed_multiplier: 1.0,
            last_updated: now,
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn kind(&self) -> VehicleKind {
        self.kind
    }

    pub fn position(&self) -> &Coordinate {
        &self.position
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, speed_multiplier: f64) {
        self.speed_multiplier = speed_multiplier;
    }

    pub fn last_updated(&self) -> SignedDuration {
        self.last_updated
    }

    pub fn status(&self) -> VehicleStatus {
        match self.state {
            VehicleState::Idle => VehicleStatus::Idle,
            VehicleState::Assigned(_) => VehicleStatus::Assigned,
            VehicleState::InTransit(_) => VehicleStatus::InTransit,
            VehicleState::Delivered { .. } => VehicleStatus::Delivered,
        }
    }

    pub fn progress(&self) -> Option<&Progress> {
        match &self.state {
            VehicleState::Assigned(progress) | VehicleState::InTransit(progress) => Some(progress),
            _ => None,
        }
    }

    pub fn is_on_route(&self, route_id: &RouteId) -> bool {
        self.progress()
            .is_some_and(|progress| &progress.route_id == route_id)
    }

    /// Idle, or any other state, to `Assigned` at the start of `route`.
    pub fn assign(&mut self, route: &Route, now: SignedDuration) {
        self.state = VehicleState::Assigned(Progress::start(route.id().clone()));
        self.position = *route.first_point();
        self.last_updated = now;
    }

    pub fn move_to(&mut self, progress: Progress, position: Coordinate, now: SignedDuration) {
        self.state = VehicleState::InTransit(progress);
        self.position = position;
        self.last_updated = now;
    }

    pub fn deliver(&mut self, position: Coordinate, now: SignedDuration, idle_at: SignedDuration) {
        self.state = VehicleState::Delivered { idle_at };
        self.position = position;
        self.last_updated = now;
    }

    /// Back to `Idle` from any state, keeping the current position.
    pub fn release(&mut self, now: SignedDuration) {
        self.state = VehicleState::Idle;
        self.last_updated = now;
    }

    /// Completes a pending `Delivered -> Idle` transition once `idle_at` is reached.
    pub fn settle(&mut self, now: SignedDuration) -> bool {
        match self.state {
            VehicleState::Delivered { idle_at } if idle_at <= now => {
                self.release(now);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{model::traffic::TrafficLevel, test_utils};

    use super::*;

    fn create_vehicle() -> Vehicle {
        Vehicle::new(
            VehicleId::from("TRK-1"),
            VehicleKind::Truck,
            Coordinate::from_lat_lon(5.0, 5.0),
            SignedDuration::ZERO,
        )
    }

    #[test]
    fn test_new_vehicle_is_idle() {
        let vehicle = create_vehicle();

        assert_eq!(vehicle.status(), VehicleStatus::Idle);
        assert!(vehicle.progress().is_none());
        assert_eq!(vehicle.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_assign_snaps_to_first_point() {
        let route = test_utils::create_route(
            "R-1",
            &[[1.0, 2.0], [3.0, 4.0]],
            &[TrafficLevel::Clear],
        );
        let mut vehicle = create_vehicle();

        vehicle.assign(&route, SignedDuration::from_secs(3));

        assert_eq!(vehicle.status(), VehicleStatus::Assigned);
        assert_eq!(vehicle.position(), route.first_point());
        assert_eq!(vehicle.progress(), Some(&Progress::start(RouteId::from("R-1"))));
        assert!(vehicle.is_on_route(route.id()));
        assert_eq!(vehicle.last_updated(), SignedDuration::from_secs(3));
    }

    #[test]
    fn test_delivered_has_no_progress_and_settles() {
        let mut vehicle = create_vehicle();
        let end = Coordinate::from_lat_lon(9.0, 9.0);

        vehicle.deliver(end, SignedDuration::from_secs(10), SignedDuration::from_secs(13));

        assert_eq!(vehicle.status(), VehicleStatus::Delivered);
        assert!(vehicle.progress().is_none());
        assert!(!vehicle.settle(SignedDuration::from_secs(12)));
        assert!(vehicle.settle(SignedDuration::from_secs(13)));
        assert_eq!(vehicle.status(), VehicleStatus::Idle);
        assert_eq!(vehicle.position(), &end);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(VehicleStatus::InTransit.to_string(), "In Transit");
        assert_eq!(VehicleStatus::Idle.to_string(), "Idle");
    }
}
