//! Cameras

#[macro_use]
extern crate log;

mod ndc;
mod orbit;
mod pinhole_camera;

// Re-export
pub use ndc::*;
pub use orbit::*;
pub use pinhole_camera::*;
