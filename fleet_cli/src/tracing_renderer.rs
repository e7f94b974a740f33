use fleet_sim::{
    model::{
        route::RouteId,
        traffic::TrafficLevel,
        vehicle::{VehicleId, VehicleStatus},
    },
    render::{
        notice::{Notice, NoticeLevel},
        renderer::Renderer,
        vehicle_frame::VehicleFrame,
    },
    simulation::{dashboard::DashboardSnapshot, eta::Eta},
};
use tracing::{debug, info, warn};

/// Writes the simulation's output to the log and keeps a few totals for the
/// end of run summary.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    pub frames: usize,
    pub deliveries: usize,
    pub traffic_changes: usize,
    pub warnings: usize,
    pub last_eta: Option<Eta>,
}

impl Renderer for TracingRenderer {
    fn vehicle_moved(&mut self, frame: &VehicleFrame) {
        self.frames += 1;

        match &frame.status_line {
            Some(status_line) => debug!(
                "{} at ({:.4}, {:.4}) {}",
                frame.vehicle_id,
                frame.position.lat(),
                frame.position.lon(),
                status_line
            ),
            None => debug!(
                "{} at ({:.4}, {:.4})",
                frame.vehicle_id,
                frame.position.lat(),
                frame.position.lon()
            ),
        }
    }

    fn vehicle_status_changed(&mut self, vehicle_id: &VehicleId, status: VehicleStatus) {
        if status == VehicleStatus::Delivered {
            self.deliveries += 1;
        }

        info!("{} is now {}", vehicle_id, status);
    }

    fn segment_traffic_changed(
        &mut self,
        route_id: &RouteId,
        segment_index: usize,
        level: TrafficLevel,
    ) {
        self.traffic_changes += 1;
        debug!(
            "{} segment {}: {} ({})",
            route_id,
            segment_index,
            level,
            level.color()
        );
    }

    fn eta_refreshed(&mut self, eta: Option<Eta>) {
        self.last_eta = eta;
    }

    fn dashboard_refreshed(&mut self, snapshot: &DashboardSnapshot) {
        info!(
            "Fleet: {} vehicles, {} moving, {} routes, ETA {}",
            snapshot.vehicle_count,
            snapshot.moving_count,
            snapshot.route_count,
            snapshot
                .headline_eta
                .map(|eta| eta.to_string())
                .unwrap_or_else(|| String::from("—"))
        );
    }

    fn notice(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!("{}", notice),
            NoticeLevel::Warning => {
                self.warnings += 1;
                warn!("{}", notice);
            }
        }
    }
}
