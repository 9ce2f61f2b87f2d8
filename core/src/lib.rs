//! Core types shared by the volume renderer: scalar math, geometry, random
//! streams, the radiance field interface and errors.

#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod common;
pub mod context;
pub mod error;
pub mod field;
pub mod geometry;
pub mod image_io;
pub mod metrics;
pub mod rng;
pub mod sampling;
pub mod spectrum;
