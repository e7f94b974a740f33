pub mod notice;
pub mod recording_renderer;
pub mod renderer;
pub mod vehicle_frame;
