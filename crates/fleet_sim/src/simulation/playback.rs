use std::collections::VecDeque;

use jiff::SignedDuration;
use tracing::{debug, instrument};

use crate::{
    render::renderer::Renderer,
    simulation::{command::Command, simulation::Simulation},
};

/// A command to dispatch once the simulation clock reaches `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedCommand {
    pub at: SignedDuration,
    pub command: Command,
}

/// Drives a [`Simulation`] with a fixed frame interval, the way a display
/// refresh would, and feeds it scripted commands along the way.
pub struct Playback {
    simulation: Simulation,
    timeline: VecDeque<TimedCommand>,
    frame_interval: SignedDuration,
    now: SignedDuration,
}

impl Playback {
    /// Commands are sorted by time; commands sharing a time keep their order.
    pub fn new(
        simulation: Simulation,
        mut timeline: Vec<TimedCommand>,
        frame_interval: SignedDuration,
    ) -> Self {
        timeline.sort_by_key(|entry| entry.at);

        let now = simulation.now();
        Self {
            simulation,
            timeline: timeline.into(),
            frame_interval: frame_interval.max(SignedDuration::from_millis(1)),
            now,
        }
    }

    /// Frame interval of a display running at `fps` frames per second.
    pub fn frame_interval_for(fps: u32) -> SignedDuration {
        SignedDuration::from_secs_f64(1.0 / f64::from(fps.max(1)))
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn now(&self) -> SignedDuration {
        self.now
    }

    pub fn pending_commands(&self) -> usize {
        self.timeline.len()
    }

    /// Dispatches the commands that are due, then runs one frame.
    pub fn step(&mut self, renderer: &mut dyn Renderer) {
        self.now += self.frame_interval;

        while let Some(entry) = self.timeline.front() {
            if entry.at > self.now {
                break;
            }

            if let Some(entry) = self.timeline.pop_front() {
                debug!("Dispatching {:?} at {}", entry.command, self.now);
                self.simulation.handle(entry.command, renderer);
            }
        }

        self.simulation.frame(self.now, renderer);
    }

    /// Steps until the clock reaches `end`. Returns the number of frames run.
    #[instrument(skip_all, level = "debug")]
    pub fn run_until(&mut self, end: SignedDuration, renderer: &mut dyn Renderer) -> usize {
        let mut frames = 0;

        while self.now + self.frame_interval <= end {
            self.step(renderer);
            frames += 1;
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::vehicle::{VehicleId, VehicleStatus},
        render::recording_renderer::RecordingRenderer,
        simulation::demo::DEMO_ROUTE_ID,
        test_utils,
    };

    use super::*;

    #[test]
    fn test_commands_dispatch_in_time_order() {
        let simulation = test_utils::create_demo_simulation();
        let timeline = vec![
            TimedCommand {
                at: SignedDuration::from_secs(2),
                command: Command::Pause,
            },
            TimedCommand {
                at: SignedDuration::from_secs(1),
                command: Command::Assign {
                    vehicle_id: VehicleId::from("TRK-1001"),
                    route_id: DEMO_ROUTE_ID.into(),
                },
            },
        ];
        let mut playback = Playback::new(simulation, timeline, Playback::frame_interval_for(10));
        let mut renderer = RecordingRenderer::default();

        playback.run_until(SignedDuration::from_millis(1500), &mut renderer);
        assert_eq!(playback.pending_commands(), 1);
        assert!(!playback.simulation().is_paused());

        let statuses = renderer.statuses_for(&VehicleId::from("TRK-1001"));
        assert_eq!(statuses.first(), Some(&VehicleStatus::Assigned));
        assert!(statuses.contains(&VehicleStatus::InTransit));

        playback.run_until(SignedDuration::from_secs(3), &mut renderer);
        assert_eq!(playback.pending_commands(), 0);
        assert!(playback.simulation().is_paused());
    }

    #[test]
    fn test_run_until_counts_frames() {
        let mut playback = Playback::new(
            test_utils::create_demo_simulation(),
            Vec::new(),
            SignedDuration::from_millis(100),
        );

        let frames = playback.run_until(SignedDuration::from_secs(1), &mut RecordingRenderer::default());

        assert_eq!(frames, 10);
        assert_eq!(playback.now(), SignedDuration::from_secs(1));
        assert_eq!(playback.simulation().now(), SignedDuration::from_secs(1));
    }
}
