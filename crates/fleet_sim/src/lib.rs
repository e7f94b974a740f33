pub mod error;
pub mod json;
pub mod model;
pub mod render;
pub mod simulation;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
