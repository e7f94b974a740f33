use crate::{
    model::{
        coordinate::Coordinate,
        route::{Route, RouteId},
        traffic::TrafficLevel,
        weather::FixedWeather,
    },
    simulation::{demo, simulation::Simulation, simulation_params::SimulationParams},
};

pub const TEST_SEED: u64 = 42;

/// `[lat, lon]` pairs to coordinates.
pub fn coordinates(points: &[[f64; 2]]) -> Vec<Coordinate> {
    points
        .iter()
        .map(|&[lat, lon]| Coordinate::from_lat_lon(lat, lon))
        .collect()
}

pub fn create_route(id: &str, points: &[[f64; 2]], traffic: &[TrafficLevel]) -> Route {
    Route::new(RouteId::from(id), coordinates(points), traffic.to_vec()).unwrap()
}

pub fn create_clear_route(id: &str, points: &[[f64; 2]]) -> Route {
    let traffic = vec![TrafficLevel::Clear; points.len().saturating_sub(1)];
    Route::new(RouteId::from(id), coordinates(points), traffic).unwrap()
}

pub fn create_test_params() -> SimulationParams {
    SimulationParams {
        seed: Some(TEST_SEED),
        ..SimulationParams::default()
    }
}

/// Empty, seeded and without weather delays.
pub fn create_simulation() -> Simulation {
    Simulation::with_weather(create_test_params(), FixedWeather(1.0)).unwrap()
}

pub fn create_demo_simulation() -> Simulation {
    let mut simulation = create_simulation();
    demo::load_demo_data(&mut simulation).unwrap();
    simulation
}
