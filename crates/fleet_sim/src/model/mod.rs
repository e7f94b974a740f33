pub mod coordinate;
pub mod kilometers;
pub mod progress;
pub mod route;
pub mod route_draft;
pub mod traffic;
pub mod vehicle;
pub mod weather;
