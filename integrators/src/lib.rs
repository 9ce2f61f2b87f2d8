//! Integrators

#[macro_use]
extern crate log;

mod chunk;
mod renderer;
mod result;
mod volume;

// Re-export.
pub use chunk::*;
pub use renderer::*;
pub use result::*;
pub use volume::*;
