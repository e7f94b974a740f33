use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fleet_sim::{
    model::{
        coordinate::Coordinate,
        route::{Route, RouteId},
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleKind},
        weather::HashedWeather,
    },
    render::renderer::NullRenderer,
    simulation::{
        eta::EtaEstimator, simulation::Simulation, simulation_params::SimulationParams,
    },
};
use jiff::SignedDuration;

fn create_route(segments: usize) -> Route {
    let points = (0..=segments)
        .map(|index| {
            let step = index as f64;
            Coordinate::from_lat_lon(18.0 + step * 0.01, 73.0 + step * 0.02)
        })
        .collect();

    Route::new(
        RouteId::from("R-BENCH"),
        points,
        vec![TrafficLevel::Moderate; segments],
    )
    .unwrap()
}

fn eta_benchmark(c: &mut Criterion) {
    let route = create_route(200);
    let estimator = EtaEstimator::default();

    c.bench_function("estimate 200 segments", |b| {
        b.iter(|| {
            estimator.estimate(
                black_box(&route),
                black_box(0),
                black_box(0.5),
                &HashedWeather,
            )
        })
    });
}

fn frame_benchmark(c: &mut Criterion) {
    let mut simulation = Simulation::new(SimulationParams {
        seed: Some(1),
        ..SimulationParams::default()
    })
    .unwrap();
    let route_id = simulation
        .add_route(None, create_route(50).points().to_vec(), None)
        .unwrap();

    for index in 0..500 {
        let vehicle_id = simulation
            .add_vehicle(
                Some(VehicleId::new(format!("TRK-{index}"))),
                VehicleKind::Truck,
                None,
            )
            .unwrap();
        simulation.assign(&vehicle_id, &route_id).unwrap();
    }

    let mut now = SignedDuration::ZERO;
    c.bench_function("frame 500 vehicles", |b| {
        b.iter(|| {
            now += SignedDuration::from_millis(16);
            simulation.frame(black_box(now), &mut NullRenderer);
        })
    });
}

criterion_group!(benches, eta_benchmark, frame_benchmark);
criterion_main!(benches);
