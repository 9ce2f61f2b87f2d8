//! Reference Radiance Fields

#[macro_use]
extern crate log;

mod grid;
mod homogeneous;
mod sphere;

// Re-export
pub use grid::*;
pub use homogeneous::*;
pub use sphere::*;
