use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::SimulationError,
    model::{traffic::TrafficDistribution, vehicle::VehicleKind},
};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SimulationParams {
    /// Seed for the traffic random source. Entropy from the OS when absent.
    pub seed: Option<u64>,

    /// Converts `speed × elapsed seconds` into segment fraction.
    pub progress_scale: f64,
    pub truck_speed: f64,
    pub drone_speed: f64,

    /// Reference speed of the ETA estimator (0.5 km/min = 30 km/h).
    pub base_km_per_minute: f64,

    pub traffic_distribution: TrafficDistribution,
    pub traffic_reroll_probability: f64,

    pub sweep_interval: SignedDuration,
    pub dashboard_interval: SignedDuration,
    pub traffic_interval: SignedDuration,

    pub delivered_idle_delay_min: SignedDuration,
    pub delivered_idle_delay_max: SignedDuration,

    pub dashboard_history: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: None,

            progress_scale: 45.0,
            truck_speed: 0.0007,
            drone_speed: 0.0012,

            base_km_per_minute: 0.5,

            traffic_distribution: TrafficDistribution::default(),
            traffic_reroll_probability: 0.12,

            sweep_interval: SignedDuration::from_secs(1),
            dashboard_interval: SignedDuration::from_secs(5),
            traffic_interval: SignedDuration::from_secs(10),

            delivered_idle_delay_min: SignedDuration::from_secs(2),
            delivered_idle_delay_max: SignedDuration::from_secs(4),

            dashboard_history: 7,
        }
    }
}

impl SimulationParams {
    pub fn base_speed(&self, kind: VehicleKind) -> f64 {
        match kind {
            VehicleKind::Truck => self.truck_speed,
            VehicleKind::Drone => self.drone_speed,
        }
    }

    /// Rejects values that would move vehicles backwards or sample traffic
    /// from something that is not a distribution.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (name, value) in [
            ("progress_scale", self.progress_scale),
            ("truck_speed", self.truck_speed),
            ("drone_speed", self.drone_speed),
            ("base_km_per_minute", self.base_km_per_minute),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }

        let distribution = self.traffic_distribution;
        for (name, value) in [
            ("traffic_distribution.clear", distribution.clear),
            ("traffic_distribution.moderate", distribution.moderate),
            (
                "traffic_distribution.clear + moderate",
                distribution.clear + distribution.moderate,
            ),
            ("traffic_reroll_probability", self.traffic_reroll_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }

        for (name, value) in [
            ("sweep_interval", self.sweep_interval),
            ("dashboard_interval", self.dashboard_interval),
            ("traffic_interval", self.traffic_interval),
            ("delivered_idle_delay_min", self.delivered_idle_delay_min),
        ] {
            if value.is_negative() {
                return Err(SimulationError::InvalidParameter {
                    name,
                    value: value.as_secs_f64(),
                });
            }
        }

        if self.delivered_idle_delay_max < self.delivered_idle_delay_min {
            return Err(SimulationError::InvalidParameter {
                name: "delivered_idle_delay_max",
                value: self.delivered_idle_delay_max.as_secs_f64(),
            });
        }

        Ok(())
    }
}
