use crate::{
    model::{
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleStatus},
    },
    render::{notice::Notice, renderer::Renderer, vehicle_frame::VehicleFrame},
    simulation::{dashboard::DashboardSnapshot, eta::Eta},
};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    VehicleMoved(VehicleFrame),
    VehicleStatusChanged(VehicleId, VehicleStatus),
    SegmentTrafficChanged(RouteId, usize, TrafficLevel),
    EtaRefreshed(Option<Eta>),
    DashboardRefreshed(DashboardSnapshot),
    Notice(Notice),
}

/// Keeps every event in order. Useful for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    pub fn notices(&self) -> Vec<&Notice> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    pub fn frames_for<'a>(&'a self, vehicle_id: &'a VehicleId) -> impl Iterator<Item = &'a VehicleFrame> {
        self.events.iter().filter_map(move |event| match event {
            RenderEvent::VehicleMoved(frame) if &frame.vehicle_id == vehicle_id => Some(frame),
            _ => None,
        })
    }

    pub fn statuses_for(&self, vehicle_id: &VehicleId) -> Vec<VehicleStatus> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::VehicleStatusChanged(id, status) if id == vehicle_id => Some(*status),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn vehicle_moved(&mut self, frame: &VehicleFrame) {
        self.events.push(RenderEvent::VehicleMoved(frame.clone()));
    }

    fn vehicle_status_changed(&mut self, vehicle_id: &VehicleId, status: VehicleStatus) {
        self.events
            .push(RenderEvent::VehicleStatusChanged(vehicle_id.clone(), status));
    }

    fn segment_traffic_changed(
        &mut self,
        route_id: &RouteId,
        segment_index: usize,
        level: TrafficLevel,
    ) {
        self.events.push(RenderEvent::SegmentTrafficChanged(
            route_id.clone(),
            segment_index,
            level,
        ));
    }

    fn eta_refreshed(&mut self, eta: Option<Eta>) {
        self.events.push(RenderEvent::EtaRefreshed(eta));
    }

    fn dashboard_refreshed(&mut self, snapshot: &DashboardSnapshot) {
        self.events
            .push(RenderEvent::DashboardRefreshed(snapshot.clone()));
    }

    fn notice(&mut self, notice: &Notice) {
        self.events.push(RenderEvent::Notice(notice.clone()));
    }
}
