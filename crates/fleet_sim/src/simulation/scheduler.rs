use std::collections::BTreeMap;

use jiff::SignedDuration;

use crate::{
    model::vehicle::VehicleId,
    simulation::{interval::IntervalTimer, simulation_params::SimulationParams},
};

/// Interval timers that came due during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTimers {
    pub sweep: bool,
    pub dashboard: bool,
    pub traffic: bool,
}

/// Drives one tick per active vehicle per frame.
///
/// Cancelling a vehicle's movement is removing its id from the active set.
/// Pausing clears the set; resuming re-arms the given ids with the resume time
/// as their last tick, so time spent paused is never travelled.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    // vehicle id -> timestamp of its previous tick
    active: BTreeMap<VehicleId, SignedDuration>,
    paused: bool,
    last_frame: SignedDuration,

    sweep: IntervalTimer,
    dashboard: IntervalTimer,
    traffic: IntervalTimer,
}

impl FrameScheduler {
    pub fn new(params: &SimulationParams, start: SignedDuration) -> Self {
        Self {
            active: BTreeMap::new(),
            paused: false,
            last_frame: start,
            sweep: IntervalTimer::new(params.sweep_interval, start),
            dashboard: IntervalTimer::new(params.dashboard_interval, start),
            traffic: IntervalTimer::new(params.traffic_interval, start),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_frame(&self) -> SignedDuration {
        self.last_frame
    }

    pub fn is_active(&self, vehicle_id: &VehicleId) -> bool {
        self.active.contains_key(vehicle_id)
    }

    /// Active ids in a stable order.
    pub fn active_ids(&self) -> Vec<VehicleId> {
        self.active.keys().cloned().collect()
    }

    /// Starts ticking `vehicle_id` from `now`. Ignored while paused, and a
    /// vehicle that is already active keeps its previous tick time.
    pub fn activate(&mut self, vehicle_id: &VehicleId, now: SignedDuration) -> bool {
        if self.paused || self.active.contains_key(vehicle_id) {
            return false;
        }

        self.active.insert(vehicle_id.clone(), now);
        true
    }

    pub fn deactivate(&mut self, vehicle_id: &VehicleId) -> bool {
        self.active.remove(vehicle_id).is_some()
    }

    /// Time since the vehicle's previous tick, recording `now` as the new one.
    pub fn take_elapsed(&mut self, vehicle_id: &VehicleId, now: SignedDuration) -> SignedDuration {
        match self.active.get_mut(vehicle_id) {
            Some(last) => {
                let elapsed = now - *last;
                *last = now;
                elapsed
            }
            None => SignedDuration::ZERO,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }

        self.paused = true;
        self.active.clear();
        true
    }

    pub fn resume<'a, I>(&mut self, vehicle_ids: I, now: SignedDuration) -> bool
    where
        I: IntoIterator<Item = &'a VehicleId>,
    {
        if !self.paused {
            return false;
        }

        self.paused = false;
        for vehicle_id in vehicle_ids {
            self.active.insert(vehicle_id.clone(), now);
        }
        true
    }

    /// Starts a frame at `now`. Returns `None` when `now` goes backwards.
    pub fn begin_frame(&mut self, now: SignedDuration) -> Option<DueTimers> {
        if now < self.last_frame {
            return None;
        }

        self.last_frame = now;

        Some(DueTimers {
            sweep: self.sweep.fire(now),
            dashboard: self.dashboard.fire(now),
            traffic: self.traffic.fire(now),
        })
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
