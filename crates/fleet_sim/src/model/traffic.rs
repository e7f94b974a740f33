use std::fmt::Display;

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    Clear,
    Moderate,
    Heavy,
}

impl TrafficLevel {
    /// Multiplier applied to a vehicle's travel speed while on the segment.
    pub fn speed_factor(self) -> f64 {
        match self {
            TrafficLevel::Clear => 1.0,
            TrafficLevel::Moderate => 0.6,
            TrafficLevel::Heavy => 0.35,
        }
    }

    /// Multiplier used by the ETA estimator. Milder than [`TrafficLevel::speed_factor`].
    pub fn eta_factor(self) -> f64 {
        match self {
            TrafficLevel::Clear => 1.0,
            TrafficLevel::Moderate => 0.7,
            TrafficLevel::Heavy => 0.45,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TrafficLevel::Clear => "lime",
            TrafficLevel::Moderate => "gold",
            TrafficLevel::Heavy => "orangered",
        }
    }
}

impl Display for TrafficLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TrafficLevel::Clear => "Clear",
                TrafficLevel::Moderate => "Moderate",
                TrafficLevel::Heavy => "Heavy",
            }
        )
    }
}

/// Categorical distribution over [`TrafficLevel`]. `Heavy` takes whatever
/// probability mass `clear` and `moderate` leave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrafficDistribution {
    pub clear: f64,
    pub moderate: f64,
}

impl Default for TrafficDistribution {
    fn default() -> Self {
        Self {
            clear: 0.6,
            moderate: 0.3,
        }
    }
}

impl TrafficDistribution {
    pub fn heavy(&self) -> f64 {
        (1.0 - self.clear - self.moderate).max(0.0)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TrafficLevel {
        let r: f64 = rng.random();
        if r < self.clear {
            TrafficLevel::Clear
        } else if r < self.clear + self.moderate {
            TrafficLevel::Moderate
        } else {
            TrafficLevel::Heavy
        }
    }
}
