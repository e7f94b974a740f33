use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    route::RouteId,
    traffic::TrafficLevel,
    vehicle::{VehicleId, VehicleKind},
};

/// User-triggered operations. Dispatched with `Simulation::handle`, which
/// reports failures as notices instead of returning them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddVehicle {
        id: Option<VehicleId>,
        #[serde(default)]
        kind: VehicleKind,
        /// `[lat, lon]`, random around the map center when absent.
        position: Option<[f64; 2]>,
    },
    RemoveVehicle {
        vehicle_id: VehicleId,
    },
    StartRoute,
    AddRoutePoint {
        /// `[lat, lon]`
        point: [f64; 2],
    },
    FinishRoute,
    CancelRoute,
    AddRoute {
        id: Option<RouteId>,
        points: Vec<[f64; 2]>,
        /// Fixed per-segment traffic, synthesized when absent.
        traffic: Option<Vec<TrafficLevel>>,
    },
    RemoveRoute {
        route_id: RouteId,
    },
    ClearRoutes,
    Assign {
        vehicle_id: VehicleId,
        route_id: RouteId,
    },
    Unassign {
        vehicle_id: VehicleId,
    },
    Pause,
    Resume,
    TogglePause,
    SetSimSpeed {
        speed: f64,
    },
    SetVehicleSpeed {
        vehicle_id: VehicleId,
        multiplier: f64,
    },
    Select {
        vehicle_id: Option<VehicleId>,
    },
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_commands() {
        let commands: Vec<Command> = serde_json::from_str(
            r#"[
                { "type": "assign", "vehicle_id": "TRK-1001", "route_id": "R-DEMO-1" },
                { "type": "add_vehicle", "id": "DRN-1", "kind": "drone", "position": [19.0, 72.8] },
                { "type": "add_vehicle" },
                { "type": "pause" }
            ]"#,
        )
        .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::Assign {
                    vehicle_id: VehicleId::from("TRK-1001"),
                    route_id: RouteId::from("R-DEMO-1"),
                },
                Command::AddVehicle {
                    id: Some(VehicleId::from("DRN-1")),
                    kind: VehicleKind::Drone,
                    position: Some([19.0, 72.8]),
                },
                Command::AddVehicle {
                    id: None,
                    kind: VehicleKind::Truck,
                    position: None,
                },
                Command::Pause,
            ]
        );
    }
}
