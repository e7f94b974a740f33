use rand::Rng;
use smallvec::SmallVec;

use crate::model::{
    route::Route,
    traffic::{TrafficDistribution, TrafficLevel},
};

/// Segment whose traffic level changed during a re-roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficChange {
    pub segment_index: usize,
    pub level: TrafficLevel,
}

/// Random traffic for route segments. Not reproducible unless the caller seeds
/// the random source.
#[derive(Debug, Clone)]
pub struct TrafficSynthesizer {
    distribution: TrafficDistribution,
    reroll_probability: f64,
}

impl TrafficSynthesizer {
    pub fn new(distribution: TrafficDistribution, reroll_probability: f64) -> Self {
        Self {
            distribution,
            reroll_probability: reroll_probability.clamp(0.0, 1.0),
        }
    }

    /// One independent draw per segment of a route with `point_count` points.
    pub fn synthesize<R: Rng + ?Sized>(&self, point_count: usize, rng: &mut R) -> Vec<TrafficLevel> {
        (0..point_count.saturating_sub(1))
            .map(|_| self.distribution.sample(rng))
            .collect()
    }

    /// Re-draws each segment with the re-roll probability, simulating incidents.
    /// Returns the segments whose level actually changed.
    pub fn reroll<R: Rng + ?Sized>(
        &self,
        route: &mut Route,
        rng: &mut R,
    ) -> SmallVec<[TrafficChange; 4]> {
        let mut changes = SmallVec::new();

        for segment_index in 0..route.segment_count() {
            if !rng.random_bool(self.reroll_probability) {
                continue;
            }

            let level = self.distribution.sample(rng);
            if route.traffic(segment_index) != Some(level) {
                route.set_traffic(segment_index, level);
                changes.push(TrafficChange {
                    segment_index,
                    level,
                });
            }
        }

        changes
    }
}

impl Default for TrafficSynthesizer {
    fn default() -> Self {
        Self::new(TrafficDistribution::default(), 0.12)
    }
}
