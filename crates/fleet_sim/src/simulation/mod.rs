pub mod command;
pub mod dashboard;
pub mod demo;
pub mod eta;
pub mod interval;
pub mod playback;
pub mod scheduler;
#[allow(clippy::module_inception)]
pub mod simulation;
pub mod simulation_params;
pub mod step;
pub mod traffic_synthesizer;
