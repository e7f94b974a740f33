use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::SimulationError,
    model::{
        coordinate::Coordinate,
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleKind},
    },
    simulation::{
        command::Command,
        playback::{Playback, TimedCommand},
        simulation::Simulation,
        simulation_params::SimulationParams,
    },
};

/// A fleet, its routes and a scripted sequence of commands. Positions are
/// `[lat, lon]`.
#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Scenario")]
pub struct JsonScenario {
    pub params: Option<SimulationParams>,

    /// Loads the demo fleet and route before the scenario's own data.
    #[serde(default)]
    pub demo: bool,

    #[serde(default)]
    pub vehicles: Vec<JsonVehicle>,

    #[serde(default)]
    pub routes: Vec<JsonRoute>,

    #[serde(default)]
    pub timeline: Vec<JsonTimelineEntry>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: VehicleId,
    #[serde(default)]
    pub kind: VehicleKind,
    pub position: [f64; 2],
    pub speed_multiplier: Option<f64>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Route")]
pub struct JsonRoute {
    pub id: RouteId,
    pub points: Vec<[f64; 2]>,

    /// One level per segment. Synthesized when absent.
    pub traffic: Option<Vec<TrafficLevel>>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "TimelineEntry")]
pub struct JsonTimelineEntry {
    /// Simulation time at which the command runs.
    pub at: SignedDuration,
    pub command: Command,
}

impl JsonScenario {
    /// `seed` takes precedence over the seed of the scenario's params.
    #[instrument(skip_all, level = "debug")]
    pub fn build_simulation(&self, seed: Option<u64>) -> Result<Simulation, SimulationError> {
        let mut params = self.params.clone().unwrap_or_default();
        if seed.is_some() {
            params.seed = seed;
        }

        let mut simulation = if self.demo {
            Simulation::with_demo_data(params)?
        } else {
            Simulation::new(params)?
        };

        for vehicle in &self.vehicles {
            let [lat, lon] = vehicle.position;
            let id = simulation.add_vehicle(
                Some(vehicle.id.clone()),
                vehicle.kind,
                Some(Coordinate::try_from_lat_lon(lat, lon)?),
            )?;

            if let Some(multiplier) = vehicle.speed_multiplier {
                simulation.set_vehicle_speed(&id, multiplier)?;
            }
        }

        for route in &self.routes {
            let points = route
                .points
                .iter()
                .map(|&[lat, lon]| Coordinate::try_from_lat_lon(lat, lon))
                .collect::<Result<Vec<_>, _>>()?;

            simulation.add_route(Some(route.id.clone()), points, route.traffic.clone())?;
        }

        Ok(simulation)
    }

    pub fn build_playback(
        self,
        seed: Option<u64>,
        frame_interval: SignedDuration,
    ) -> Result<Playback, SimulationError> {
        let simulation = self.build_simulation(seed)?;

        let timeline = self
            .timeline
            .into_iter()
            .map(|entry| TimedCommand {
                at: entry.at,
                command: entry.command,
            })
            .collect();

        Ok(Playback::new(simulation, timeline, frame_interval))
    }
}
