//! The API

#[macro_use]
extern crate log;

mod render;
mod render_path;

// Re-export
pub use render::*;
pub use render_path::*;
