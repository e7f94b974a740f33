pub mod mock_rng;

use fleet_sim::{
    model::{
        coordinate::Coordinate,
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleKind},
        weather::FixedWeather,
    },
    render::renderer::Renderer,
    simulation::{simulation::Simulation, simulation_params::SimulationParams},
};
use jiff::SignedDuration;

pub fn secs(value: i64) -> SignedDuration {
    SignedDuration::from_secs(value)
}

pub fn create_params(seed: u64) -> SimulationParams {
    SimulationParams {
        seed: Some(seed),
        ..SimulationParams::default()
    }
}

/// One truck at `(0, 0)` and a clear two segment route along the equator.
/// Traffic never changes and weather never slows anything down.
pub fn create_equator_simulation() -> Simulation {
    let params = SimulationParams {
        traffic_reroll_probability: 0.0,
        ..create_params(1)
    };
    let mut simulation = Simulation::with_weather(params, FixedWeather(1.0)).unwrap();

    simulation
        .add_vehicle(
            Some(VehicleId::from("TRK-1")),
            VehicleKind::Truck,
            Some(Coordinate::from_lat_lon(0.0, 0.0)),
        )
        .unwrap();
    simulation
        .add_route(
            Some(RouteId::from("R-1")),
            vec![
                Coordinate::from_lat_lon(0.0, 0.0),
                Coordinate::from_lat_lon(0.0, 1.0),
                Coordinate::from_lat_lon(0.0, 2.0),
            ],
            Some(vec![TrafficLevel::Clear, TrafficLevel::Clear]),
        )
        .unwrap();

    simulation
}

/// Runs frames every `step` from the simulation's current time up to `end`.
pub fn run_frames(
    simulation: &mut Simulation,
    end: SignedDuration,
    step: SignedDuration,
    renderer: &mut dyn Renderer,
) {
    let mut now = simulation.now();
    while now < end {
        now += step;
        simulation.frame(now, renderer);
    }
}
