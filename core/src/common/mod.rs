//! Common numeric definitions shared by every crate in the workspace.

mod clamp;
mod math;

// Re-export
pub use clamp::*;
pub use math::*;
