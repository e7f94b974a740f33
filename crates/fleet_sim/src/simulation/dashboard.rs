use std::collections::VecDeque;

use serde::Serialize;

use crate::{
    model::vehicle::{Vehicle, VehicleId},
    simulation::eta::Eta,
};

const SEED_HISTORY: [usize; 6] = [2, 3, 4, 3, 5, 4];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Fleet size samples, oldest first.
    pub active_history: Vec<usize>,
    pub vehicle_count: usize,
    pub moving_count: usize,
    pub route_count: usize,
    pub headline_eta: Option<Eta>,
    pub selected: Option<VehicleId>,
    pub paused: bool,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    active_history: VecDeque<usize>,
    capacity: usize,
    selected: Option<VehicleId>,
}

impl Dashboard {
    pub fn new(capacity: usize, vehicle_count: usize) -> Self {
        let capacity = capacity.max(1);
        let mut active_history: VecDeque<usize> = SEED_HISTORY
            .iter()
            .skip(SEED_HISTORY.len().saturating_sub(capacity - 1))
            .copied()
            .collect();
        active_history.push_back(vehicle_count);

        Self {
            active_history,
            capacity,
            selected: None,
        }
    }

    pub fn record(&mut self, vehicle_count: usize) {
        if self.active_history.len() >= self.capacity {
            self.active_history.pop_front();
        }
        self.active_history.push_back(vehicle_count);
    }

    pub fn history(&self) -> Vec<usize> {
        self.active_history.iter().copied().collect()
    }

    pub fn selected(&self) -> Option<&VehicleId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, vehicle_id: Option<VehicleId>) {
        self.selected = vehicle_id;
    }
}

/// Case-insensitive match on the vehicle id or its status label. An empty
/// query matches everything.
pub fn matches_filter(vehicle: &Vehicle, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    vehicle.id().as_str().to_lowercase().contains(&query)
        || vehicle.status().to_string().to_lowercase().contains(&query)
}
