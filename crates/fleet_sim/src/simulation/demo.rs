use crate::{
    error::SimulationError,
    model::{
        coordinate::Coordinate,
        route::RouteId,
        vehicle::{VehicleId, VehicleKind},
    },
    simulation::simulation::Simulation,
};

/// `[lat, lon]` the map opens on.
pub const MAP_CENTER: [f64; 2] = [20.5937, 78.9629];

/// `[lat, lon]` vehicles without a position are scattered around.
pub const SPAWN_CENTER: [f64; 2] = [20.5937, 78.9];

pub const DEMO_ROUTE_ID: &str = "R-DEMO-1";

const DEMO_VEHICLES: [(&str, [f64; 2]); 3] = [
    ("TRK-1001", [19.0760, 72.8777]),
    ("TRK-2002", [12.9716, 77.5946]),
    ("TRK-3003", [13.0827, 80.2707]),
];

// Mumbai, Pune, Hyderabad
const DEMO_ROUTE: [[f64; 2]; 3] = [[19.0760, 72.8777], [18.5204, 73.8567], [17.3850, 78.4867]];

/// Three idle trucks and one route with freshly synthesized traffic.
pub fn load_demo_data(simulation: &mut Simulation) -> Result<(), SimulationError> {
    for (id, [lat, lon]) in DEMO_VEHICLES {
        simulation.add_vehicle(
            Some(VehicleId::from(id)),
            VehicleKind::Truck,
            Some(Coordinate::from_lat_lon(lat, lon)),
        )?;
    }

    let points = DEMO_ROUTE
        .iter()
        .map(|&[lat, lon]| Coordinate::from_lat_lon(lat, lon))
        .collect();
    simulation.add_route(Some(RouteId::from(DEMO_ROUTE_ID)), points, None)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        model::vehicle::VehicleStatus,
        simulation::simulation_params::SimulationParams,
    };

    use super::*;

    #[test]
    fn test_demo_data() {
        let simulation = Simulation::with_demo_data(SimulationParams {
            seed: Some(7),
            ..SimulationParams::default()
        })
        .unwrap();

        assert_eq!(simulation.vehicles().count(), 3);
        assert!(
            simulation
                .vehicles()
                .all(|vehicle| vehicle.status() == VehicleStatus::Idle)
        );

        let route = simulation.route(&RouteId::from(DEMO_ROUTE_ID)).unwrap();
        assert_eq!(route.points().len(), 3);
        assert_eq!(route.segment_traffic().len(), 2);
        assert!((route.segment_length(0).value() - 120.152).abs() < 1e-2);
    }
}
