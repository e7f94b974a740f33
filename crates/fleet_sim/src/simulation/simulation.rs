use std::collections::BTreeMap;

use fxhash::FxHashMap;
use jiff::SignedDuration;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::SimulationError,
    model::{
        coordinate::Coordinate,
        route::{Route, RouteId},
        route_draft::RouteDraft,
        traffic::TrafficLevel,
        vehicle::{Vehicle, VehicleId, VehicleKind, VehicleStatus},
        weather::{HashedWeather, WeatherModel},
    },
    render::{
        notice::Notice,
        renderer::Renderer,
        vehicle_frame::{StatusLine, VehicleFrame},
    },
    simulation::{
        command::Command,
        dashboard::{self, Dashboard, DashboardSnapshot},
        demo,
        eta::{Eta, EtaEstimator},
        scheduler::FrameScheduler,
        simulation_params::SimulationParams,
        step::{self, Motion, Step},
        traffic_synthesizer::TrafficSynthesizer,
    },
};

/// A deleted route and the vehicles that were sent back to idle because of it.
#[derive(Debug)]
pub struct RouteRemoval {
    pub route: Route,
    pub released: Vec<VehicleId>,
}

/// Owns the whole state of one simulated fleet. Several simulations can live
/// side by side; nothing is shared between them.
pub struct Simulation {
    params: SimulationParams,

    vehicles: BTreeMap<VehicleId, Vehicle>,
    routes: BTreeMap<RouteId, Route>,
    assignments: FxHashMap<VehicleId, RouteId>,
    draft: Option<RouteDraft>,

    scheduler: FrameScheduler,
    dashboard: Dashboard,
    traffic: TrafficSynthesizer,
    eta: EtaEstimator,
    weather: Box<dyn WeatherModel + Send + Sync>,
    rng: SmallRng,

    sim_speed: f64,
    now: SignedDuration,
    route_sequence: usize,
}

impl Simulation {
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        Self::with_weather(params, HashedWeather)
    }

    pub fn with_weather<W>(params: SimulationParams, weather: W) -> Result<Self, SimulationError>
    where
        W: WeatherModel + Send + Sync + 'static,
    {
        params.validate()?;

        let rng = match params.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Ok(Simulation {
            scheduler: FrameScheduler::new(&params, SignedDuration::ZERO),
            dashboard: Dashboard::new(params.dashboard_history, 0),
            traffic: TrafficSynthesizer::new(
                params.traffic_distribution,
                params.traffic_reroll_probability,
            ),
            eta: EtaEstimator::new(params.base_km_per_minute),
            weather: Box::new(weather),
            rng,
            vehicles: BTreeMap::new(),
            routes: BTreeMap::new(),
            assignments: FxHashMap::default(),
            draft: None,
            sim_speed: 1.0,
            now: SignedDuration::ZERO,
            route_sequence: 0,
            params,
        })
    }

    /// A simulation preloaded with the demo fleet and route.
    pub fn with_demo_data(params: SimulationParams) -> Result<Self, SimulationError> {
        let mut simulation = Self::new(params)?;
        demo::load_demo_data(&mut simulation)?;
        Ok(simulation)
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn now(&self) -> SignedDuration {
        self.now
    }

    pub fn sim_speed(&self) -> f64 {
        self.sim_speed
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn vehicle(&self, vehicle_id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn route(&self, route_id: &RouteId) -> Option<&Route> {
        self.routes.get(route_id)
    }

    pub fn assignment(&self, vehicle_id: &VehicleId) -> Option<&RouteId> {
        self.assignments.get(vehicle_id)
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn draft(&self) -> Option<&RouteDraft> {
        self.draft.as_ref()
    }

    pub fn is_ticking(&self, vehicle_id: &VehicleId) -> bool {
        self.scheduler.is_active(vehicle_id)
    }

    pub fn selected(&self) -> Option<&VehicleId> {
        self.dashboard.selected()
    }

    pub fn add_vehicle(
        &mut self,
        id: Option<VehicleId>,
        kind: VehicleKind,
        position: Option<Coordinate>,
    ) -> Result<VehicleId, SimulationError> {
        let id = match id {
            Some(id) if self.vehicles.contains_key(&id) => {
                return Err(SimulationError::DuplicateVehicle(id));
            }
            Some(id) => id,
            None => self.generate_vehicle_id(),
        };

        let position = match position {
            Some(position) => position,
            None => self.random_position(),
        };

        self.vehicles.insert(
            id.clone(),
            Vehicle::new(id.clone(), kind, position, self.now),
        );
        info!("Vehicle {} ({}) added", id, kind);

        Ok(id)
    }

    pub fn remove_vehicle(&mut self, vehicle_id: &VehicleId) -> Result<Vehicle, SimulationError> {
        let vehicle = self
            .vehicles
            .remove(vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;

        self.assignments.remove(vehicle_id);
        self.scheduler.deactivate(vehicle_id);
        if self.dashboard.selected() == Some(vehicle_id) {
            self.dashboard.select(None);
        }

        info!("Vehicle {} removed", vehicle_id);
        Ok(vehicle)
    }

    /// Starts drawing a new route, discarding any unfinished one.
    pub fn start_route(&mut self) -> RouteId {
        let id = self.next_route_id();
        if let Some(previous) = self.draft.replace(RouteDraft::new(id.clone())) {
            warn!("Discarding unfinished route {}", previous.id());
        }

        info!("Route creation started");
        id
    }

    pub fn add_route_point(&mut self, point: Coordinate) -> Result<usize, SimulationError> {
        let draft = self
            .draft
            .as_mut()
            .ok_or(SimulationError::NoRouteInProgress)?;

        draft.push(point);
        Ok(draft.len())
    }

    pub fn cancel_route(&mut self) -> Result<RouteDraft, SimulationError> {
        let draft = self.draft.take().ok_or(SimulationError::NoRouteInProgress)?;

        info!("Route creation canceled");
        Ok(draft)
    }

    /// Turns the route being drawn into a route with synthesized traffic. The
    /// draft is kept when it cannot become a route yet.
    pub fn finish_route(&mut self) -> Result<RouteId, SimulationError> {
        let draft = self
            .draft
            .as_ref()
            .ok_or(SimulationError::NoRouteInProgress)?;

        if draft.len() < 2 {
            return Err(SimulationError::RouteTooShort {
                points: draft.len(),
            });
        }
        if self.routes.contains_key(draft.id()) {
            return Err(SimulationError::DuplicateRoute(draft.id().clone()));
        }

        let Some(draft) = self.draft.take() else {
            return Err(SimulationError::NoRouteInProgress);
        };
        let (id, points) = draft.into_parts();
        self.insert_route(id, points, None)
    }

    /// Adds a complete route in one go. Traffic is synthesized unless given.
    pub fn add_route(
        &mut self,
        id: Option<RouteId>,
        points: Vec<Coordinate>,
        traffic: Option<Vec<TrafficLevel>>,
    ) -> Result<RouteId, SimulationError> {
        let id = match id {
            Some(id) => id,
            None => self.next_route_id(),
        };

        self.insert_route(id, points, traffic)
    }

    fn insert_route(
        &mut self,
        id: RouteId,
        points: Vec<Coordinate>,
        traffic: Option<Vec<TrafficLevel>>,
    ) -> Result<RouteId, SimulationError> {
        if self.routes.contains_key(&id) {
            return Err(SimulationError::DuplicateRoute(id));
        }

        let traffic = match traffic {
            Some(traffic) => traffic,
            None => self.traffic.synthesize(points.len(), &mut self.rng),
        };

        let route = Route::new(id.clone(), points, traffic)?;
        info!(
            "Route {} created with {} points",
            id,
            route.points().len()
        );
        self.routes.insert(id.clone(), route);

        Ok(id)
    }

    /// Deletes a route. Every vehicle assigned to it, or moving along it, goes
    /// back to idle.
    pub fn remove_route(&mut self, route_id: &RouteId) -> Result<RouteRemoval, SimulationError> {
        let route = self
            .routes
            .remove(route_id)
            .ok_or_else(|| SimulationError::RouteNotFound(route_id.clone()))?;

        let mut released = Vec::new();
        for (vehicle_id, vehicle) in self.vehicles.iter_mut() {
            let assigned = self.assignments.get(vehicle_id) == Some(route_id);
            if assigned || vehicle.is_on_route(route_id) {
                self.assignments.remove(vehicle_id);
                self.scheduler.deactivate(vehicle_id);
                vehicle.release(self.now);
                released.push(vehicle_id.clone());
            }
        }

        info!("Route {} removed", route_id);
        Ok(RouteRemoval { route, released })
    }

    pub fn clear_routes(&mut self) -> Vec<RouteRemoval> {
        let route_ids: Vec<RouteId> = self.routes.keys().cloned().collect();

        route_ids
            .iter()
            .filter_map(|route_id| self.remove_route(route_id).ok())
            .collect()
    }

    /// Puts the vehicle at the start of the route and begins ticking it.
    pub fn assign(
        &mut self,
        vehicle_id: &VehicleId,
        route_id: &RouteId,
    ) -> Result<(), SimulationError> {
        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;
        let route = self
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::RouteNotFound(route_id.clone()))?;

        vehicle.assign(route, self.now);
        self.assignments.insert(vehicle_id.clone(), route_id.clone());

        self.scheduler.deactivate(vehicle_id);
        self.scheduler.activate(vehicle_id, self.now);

        info!("Assigned {} to {}", route_id, vehicle_id);
        Ok(())
    }

    /// Returns whether the vehicle was on a route and is idle now.
    pub fn unassign(&mut self, vehicle_id: &VehicleId) -> Result<bool, SimulationError> {
        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;

        self.assignments.remove(vehicle_id);
        self.scheduler.deactivate(vehicle_id);

        let released = vehicle.progress().is_some();
        if released {
            vehicle.release(self.now);
        }

        info!("Unassigned {}", vehicle_id);
        Ok(released)
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.scheduler.pause();
        if paused {
            info!("Simulation paused");
        }
        paused
    }

    /// Resumes ticking every vehicle that still has somewhere to go.
    pub fn resume(&mut self) -> bool {
        let moving: Vec<VehicleId> = self
            .vehicles
            .values()
            .filter(|vehicle| vehicle.progress().is_some())
            .map(|vehicle| vehicle.id().clone())
            .collect();

        let resumed = self.scheduler.resume(&moving, self.now);
        if resumed {
            info!("Simulation resumed, {} vehicles moving", moving.len());
        }
        resumed
    }

    /// Returns whether the simulation is paused afterwards.
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }

        self.is_paused()
    }

    pub fn set_sim_speed(&mut self, speed: f64) -> Result<(), SimulationError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(SimulationError::InvalidSpeed(speed));
        }

        self.sim_speed = speed;
        Ok(())
    }

    pub fn set_vehicle_speed(
        &mut self,
        vehicle_id: &VehicleId,
        multiplier: f64,
    ) -> Result<(), SimulationError> {
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(SimulationError::InvalidSpeed(multiplier));
        }

        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;
        vehicle.set_speed_multiplier(multiplier);

        Ok(())
    }

    /// Selects the vehicle whose ETA is shown as the headline, `None` goes
    /// back to the average over all routes.
    pub fn select(&mut self, vehicle_id: Option<VehicleId>) -> Result<Option<Eta>, SimulationError> {
        if let Some(missing) = vehicle_id
            .as_ref()
            .filter(|vehicle_id| !self.vehicles.contains_key(*vehicle_id))
        {
            return Err(SimulationError::VehicleNotFound(missing.clone()));
        }

        self.dashboard.select(vehicle_id);
        Ok(self.headline_eta())
    }

    /// ETA of a vehicle from its current progress, or from the start of its
    /// assigned route.
    pub fn vehicle_eta(&self, vehicle_id: &VehicleId) -> Result<Eta, SimulationError> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)
            .ok_or_else(|| SimulationError::VehicleNotFound(vehicle_id.clone()))?;

        let (route_id, segment_index, fraction) = match vehicle.progress() {
            Some(progress) => (&progress.route_id, progress.segment_index, progress.fraction),
            None => match self.assignments.get(vehicle_id) {
                Some(route_id) => (route_id, 0, 0.0),
                None => return Err(SimulationError::NoProgress(vehicle_id.clone())),
            },
        };

        let route = self
            .routes
            .get(route_id)
            .ok_or_else(|| SimulationError::RouteNotFound(route_id.clone()))?;

        Ok(self
            .eta
            .estimate(route, segment_index, fraction, &*self.weather))
    }

    /// Rounded mean of the full-route ETA of every route.
    pub fn average_route_eta(&self) -> Option<Eta> {
        if self.routes.is_empty() {
            return None;
        }

        let total: f64 = self
            .routes
            .values()
            .map(|route| f64::from(self.eta.estimate(route, 0, 0.0, &*self.weather).minutes()))
            .sum();

        Some(Eta::from_minutes(
            (total / self.routes.len() as f64).round() as u32,
        ))
    }

    pub fn headline_eta(&self) -> Option<Eta> {
        match self.dashboard.selected() {
            Some(vehicle_id) => self.vehicle_eta(vehicle_id).ok(),
            None => self.average_route_eta(),
        }
    }

    pub fn filter_vehicles(&self, query: &str) -> Vec<&Vehicle> {
        self.vehicles
            .values()
            .filter(|vehicle| dashboard::matches_filter(vehicle, query))
            .collect()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            active_history: self.dashboard.history(),
            vehicle_count: self.vehicles.len(),
            moving_count: self
                .vehicles
                .values()
                .filter(|vehicle| vehicle.progress().is_some())
                .count(),
            route_count: self.routes.len(),
            headline_eta: self.headline_eta(),
            selected: self.dashboard.selected().cloned(),
            paused: self.is_paused(),
        }
    }

    /// Drops every vehicle and route and loads the demo data again.
    pub fn reset(&mut self) -> Result<(), SimulationError> {
        self.vehicles.clear();
        self.routes.clear();
        self.assignments.clear();
        self.draft = None;
        self.scheduler.clear();
        self.dashboard.select(None);

        demo::load_demo_data(self)?;
        info!("Demo reset");
        Ok(())
    }

    /// Processes one frame of the host clock.
    ///
    /// Returns delivered vehicles to idle when their delay is over, ticks every
    /// active vehicle once and runs the interval timers that came due. While
    /// paused no vehicle moves and traffic stays as it is.
    #[instrument(skip_all, level = "debug")]
    pub fn frame(&mut self, now: SignedDuration, renderer: &mut dyn Renderer) {
        let Some(due) = self.scheduler.begin_frame(now) else {
            warn!(
                "Ignoring frame at {}, clock went backwards from {}",
                now, self.now
            );
            return;
        };

        self.now = now;
        self.settle_deliveries(renderer);

        let paused = self.scheduler.is_paused();

        if due.sweep && !paused {
            self.reassignment_sweep(renderer);
        }

        if !paused {
            for vehicle_id in self.scheduler.active_ids() {
                self.tick_vehicle(&vehicle_id, renderer);
            }
        }

        if due.sweep && self.dashboard.selected().is_some() {
            renderer.eta_refreshed(self.headline_eta());
        }

        if due.dashboard {
            self.dashboard.record(self.vehicles.len());
            let snapshot = self.snapshot();
            renderer.eta_refreshed(snapshot.headline_eta);
            renderer.dashboard_refreshed(&snapshot);
        }

        if due.traffic && !paused {
            self.reroll_traffic(renderer);
        }
    }

    fn settle_deliveries(&mut self, renderer: &mut dyn Renderer) {
        for (vehicle_id, vehicle) in self.vehicles.iter_mut() {
            if vehicle.settle(self.now) {
                debug!("Vehicle {} available again", vehicle_id);
                renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Idle);
            }
        }
    }

    fn tick_vehicle(&mut self, vehicle_id: &VehicleId, renderer: &mut dyn Renderer) {
        let elapsed = self.scheduler.take_elapsed(vehicle_id, self.now);

        let Some(vehicle) = self.vehicles.get_mut(vehicle_id) else {
            self.scheduler.deactivate(vehicle_id);
            return;
        };

        let Some(progress) = vehicle.progress().cloned() else {
            self.scheduler.deactivate(vehicle_id);
            return;
        };

        let Some(route) = self.routes.get(&progress.route_id) else {
            warn!(
                "Route {} of vehicle {} is gone, vehicle is idle again",
                progress.route_id, vehicle_id
            );
            vehicle.release(self.now);
            self.assignments.remove(vehicle_id);
            self.scheduler.deactivate(vehicle_id);
            renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Idle);
            return;
        };

        let motion = Motion {
            base_speed: self.params.base_speed(vehicle.kind()),
            speed_multiplier: vehicle.speed_multiplier(),
            sim_speed: self.sim_speed,
            scale: self.params.progress_scale,
        };
        let previous_status = vehicle.status();

        match step::advance(&progress, route, &motion, elapsed, &*self.weather) {
            Step::Moved {
                progress,
                position,
                traffic,
            } => {
                let eta = self.eta.estimate(
                    route,
                    progress.segment_index,
                    progress.fraction,
                    &*self.weather,
                );
                let heading = route
                    .segment(progress.segment_index)
                    .map(|(_, to)| position.bearing(to));

                let frame = VehicleFrame {
                    vehicle_id: vehicle_id.clone(),
                    position,
                    heading,
                    status: VehicleStatus::InTransit,
                    status_line: Some(StatusLine {
                        route_id: progress.route_id.clone(),
                        traffic,
                        eta,
                    }),
                };

                vehicle.move_to(progress, position, self.now);

                if previous_status != VehicleStatus::InTransit {
                    renderer.vehicle_status_changed(vehicle_id, VehicleStatus::InTransit);
                }
                renderer.vehicle_moved(&frame);
            }
            Step::Delivered { position } => {
                let delay = idle_delay(&self.params, &mut self.rng);
                vehicle.deliver(position, self.now, self.now + delay);

                self.assignments.remove(vehicle_id);
                self.scheduler.deactivate(vehicle_id);

                info!(
                    "Vehicle {} delivered on {}, available in {:.1}s",
                    vehicle_id,
                    progress.route_id,
                    delay.as_secs_f64()
                );

                renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Delivered);
                renderer.vehicle_moved(&VehicleFrame {
                    vehicle_id: vehicle_id.clone(),
                    position,
                    heading: None,
                    status: VehicleStatus::Delivered,
                    status_line: None,
                });
            }
        }
    }

    /// Re-arms vehicles that have progress but are not ticking, and sends
    /// vehicles whose route disappeared back to idle. Returns how many vehicles
    /// were touched.
    pub fn reassignment_sweep(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut touched = 0;

        for (vehicle_id, vehicle) in self.vehicles.iter_mut() {
            let Some(progress) = vehicle.progress() else {
                if self.assignments.remove(vehicle_id).is_some() {
                    debug!("Dropped stale assignment of {}", vehicle_id);
                    touched += 1;
                }
                continue;
            };

            if !self.routes.contains_key(&progress.route_id) {
                warn!(
                    "Route {} of vehicle {} is gone, vehicle is idle again",
                    progress.route_id, vehicle_id
                );
                vehicle.release(self.now);
                self.assignments.remove(vehicle_id);
                self.scheduler.deactivate(vehicle_id);
                renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Idle);
                touched += 1;
            } else if self.scheduler.activate(vehicle_id, self.now) {
                debug!("Re-armed vehicle {}", vehicle_id);
                touched += 1;
            }
        }

        touched
    }

    /// Re-draws segment traffic on every route. Returns the number of segments
    /// that changed.
    pub fn reroll_traffic(&mut self, renderer: &mut dyn Renderer) -> usize {
        let mut changed = 0;

        for (route_id, route) in self.routes.iter_mut() {
            for change in self.traffic.reroll(route, &mut self.rng) {
                debug!(
                    "Traffic on {} segment {} is now {}",
                    route_id, change.segment_index, change.level
                );
                renderer.segment_traffic_changed(route_id, change.segment_index, change.level);
                changed += 1;
            }
        }

        changed
    }

    /// Runs a command, reporting the outcome through the renderer's notice
    /// channel. Errors never escape.
    pub fn handle(&mut self, command: Command, renderer: &mut dyn Renderer) {
        match self.execute(command, renderer) {
            Ok(Some(message)) => renderer.notice(&Notice::info(message)),
            Ok(None) => {}
            Err(error) => {
                warn!("{}", error);
                renderer.notice(&Notice::warning(error.to_string()));
            }
        }
    }

    fn execute(
        &mut self,
        command: Command,
        renderer: &mut dyn Renderer,
    ) -> Result<Option<String>, SimulationError> {
        match command {
            Command::AddVehicle { id, kind, position } => {
                let position = position
                    .map(|[lat, lon]| Coordinate::try_from_lat_lon(lat, lon))
                    .transpose()?;
                let id = self.add_vehicle(id, kind, position)?;

                Ok(Some(format!("Vehicle {id} added")))
            }
            Command::RemoveVehicle { vehicle_id } => {
                self.remove_vehicle(&vehicle_id)?;

                Ok(Some(format!("Vehicle {vehicle_id} removed")))
            }
            Command::StartRoute => {
                self.start_route();

                Ok(Some(String::from(
                    "Route creation started, add points to the map",
                )))
            }
            Command::AddRoutePoint { point: [lat, lon] } => {
                self.add_route_point(Coordinate::try_from_lat_lon(lat, lon)?)?;

                Ok(None)
            }
            Command::FinishRoute => {
                let route_id = self.finish_route()?;
                self.render_route(&route_id, renderer);

                Ok(Some(format!("Route saved: {route_id}")))
            }
            Command::CancelRoute => {
                self.cancel_route()?;

                Ok(Some(String::from("Route creation canceled")))
            }
            Command::AddRoute {
                id,
                points,
                traffic,
            } => {
                let points = points
                    .into_iter()
                    .map(|[lat, lon]| Coordinate::try_from_lat_lon(lat, lon))
                    .collect::<Result<Vec<_>, _>>()?;
                let route_id = self.add_route(id, points, traffic)?;
                self.render_route(&route_id, renderer);

                Ok(Some(format!("Route saved: {route_id}")))
            }
            Command::RemoveRoute { route_id } => {
                let removal = self.remove_route(&route_id)?;
                for vehicle_id in &removal.released {
                    renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Idle);
                }

                Ok(Some(format!("Route {route_id} removed")))
            }
            Command::ClearRoutes => {
                for removal in self.clear_routes() {
                    for vehicle_id in &removal.released {
                        renderer.vehicle_status_changed(vehicle_id, VehicleStatus::Idle);
                    }
                }

                Ok(Some(String::from("All routes cleared")))
            }
            Command::Assign {
                vehicle_id,
                route_id,
            } => {
                self.assign(&vehicle_id, &route_id)?;

                if let (Some(vehicle), Ok(eta)) =
                    (self.vehicles.get(&vehicle_id), self.vehicle_eta(&vehicle_id))
                {
                    renderer.vehicle_status_changed(&vehicle_id, VehicleStatus::Assigned);
                    renderer.vehicle_moved(&VehicleFrame {
                        vehicle_id: vehicle_id.clone(),
                        position: *vehicle.position(),
                        heading: None,
                        status: VehicleStatus::Assigned,
                        status_line: self.routes.get(&route_id).map(|route| StatusLine {
                            route_id: route_id.clone(),
                            traffic: route.traffic(0).unwrap_or(TrafficLevel::Clear),
                            eta,
                        }),
                    });
                }

                Ok(None)
            }
            Command::Unassign { vehicle_id } => {
                if self.unassign(&vehicle_id)? {
                    renderer.vehicle_status_changed(&vehicle_id, VehicleStatus::Idle);
                }

                Ok(None)
            }
            Command::Pause => Ok(self
                .pause()
                .then(|| String::from("Simulation paused"))),
            Command::Resume => Ok(self
                .resume()
                .then(|| String::from("Simulation resumed"))),
            Command::TogglePause => Ok(Some(String::from(if self.toggle_pause() {
                "Simulation paused"
            } else {
                "Simulation resumed"
            }))),
            Command::SetSimSpeed { speed } => {
                self.set_sim_speed(speed)?;

                Ok(None)
            }
            Command::SetVehicleSpeed {
                vehicle_id,
                multiplier,
            } => {
                self.set_vehicle_speed(&vehicle_id, multiplier)?;

                Ok(None)
            }
            Command::Select { vehicle_id } => {
                let eta = self.select(vehicle_id)?;
                renderer.eta_refreshed(eta);

                Ok(None)
            }
            Command::Reset => {
                self.reset()?;

                Ok(Some(String::from("Demo reset")))
            }
        }
    }

    fn render_route(&self, route_id: &RouteId, renderer: &mut dyn Renderer) {
        if let Some(route) = self.routes.get(route_id) {
            for (segment_index, level) in route.segment_traffic().iter().enumerate() {
                renderer.segment_traffic_changed(route_id, segment_index, *level);
            }
        }
    }

    fn next_route_id(&mut self) -> RouteId {
        loop {
            self.route_sequence += 1;
            let id = RouteId::new(format!("R-{}", self.route_sequence));

            let drafted = self.draft.as_ref().is_some_and(|draft| draft.id() == &id);
            if !drafted && !self.routes.contains_key(&id) {
                return id;
            }
        }
    }

    fn generate_vehicle_id(&mut self) -> VehicleId {
        for _ in 0..100 {
            let id = VehicleId::new(format!("TRK-{}", self.rng.random_range(1000..=9999)));
            if !self.vehicles.contains_key(&id) {
                return id;
            }
        }

        let mut number = 10_000;
        loop {
            let id = VehicleId::new(format!("TRK-{number}"));
            if !self.vehicles.contains_key(&id) {
                return id;
            }
            number += 1;
        }
    }

    fn random_position(&mut self) -> Coordinate {
        let [lat, lon] = demo::SPAWN_CENTER;
        Coordinate::from_lat_lon(
            lat + (self.rng.random::<f64>() - 0.5) * 5.0,
            lon + (self.rng.random::<f64>() - 0.5) * 8.0,
        )
    }
}

fn idle_delay(params: &SimulationParams, rng: &mut SmallRng) -> SignedDuration {
    let min = params.delivered_idle_delay_min.as_secs_f64();
    let max = params.delivered_idle_delay_max.as_secs_f64();

    if max <= min {
        return params.delivered_idle_delay_min;
    }

    SignedDuration::from_secs_f64(rng.random_range(min..max))
}
