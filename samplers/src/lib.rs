//! Samplers

#[macro_use]
extern crate log;

mod depth;
mod hierarchical;

// Re-export.
pub use depth::*;
pub use hierarchical::*;
