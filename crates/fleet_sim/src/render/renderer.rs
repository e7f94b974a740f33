use crate::{
    model::{
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleStatus},
    },
    render::{notice::Notice, vehicle_frame::VehicleFrame},
    simulation::{dashboard::DashboardSnapshot, eta::Eta},
};

/// Receives the simulation's output. Every method defaults to doing nothing so
/// implementations only override what they draw.
pub trait Renderer {
    fn vehicle_moved(&mut self, _frame: &VehicleFrame) {}

    fn vehicle_status_changed(&mut self, _vehicle_id: &VehicleId, _status: VehicleStatus) {}

    fn segment_traffic_changed(
        &mut self,
        _route_id: &RouteId,
        _segment_index: usize,
        _level: TrafficLevel,
    ) {
    }

    /// Headline ETA refresh. `None` renders as a dash.
    fn eta_refreshed(&mut self, _eta: Option<Eta>) {}

    fn dashboard_refreshed(&mut self, _snapshot: &DashboardSnapshot) {}

    fn notice(&mut self, _notice: &Notice) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}
