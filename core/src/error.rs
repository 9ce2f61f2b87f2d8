//! Error types for the volume renderer.

use crate::common::Float;
use thiserror::Error;

/// Errors raised by the rendering pipeline. Every variant describes a
/// precondition violation or an internal inconsistency; numerical trouble in
/// composited values is reported as a diagnostic instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ray count mismatch: {origins} origins but {directions} directions")]
    RayCountMismatch { origins: usize, directions: usize },

    #[error("bounds count mismatch: {rays} rays but {bounds} near/far pairs")]
    BoundsCountMismatch { rays: usize, bounds: usize },

    #[error("invalid bounds for ray {index}: near = {near}, far = {far}")]
    InvalidBounds { index: usize, near: Float, far: Float },

    #[error("invalid sample count: {0}")]
    InvalidSampleCount(String),

    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(String),

    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },

    #[error("voxel grid of {nx}x{ny}x{nz} cells needs {expected} values, got {actual}")]
    InvalidGrid {
        nx: usize,
        ny: usize,
        nz: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid ray record of length {0}; expected 8 or 11 values")]
    InvalidRayRecord(usize),

    #[error("ray {index} cannot be remapped to NDC: direction z-component is {dz}")]
    DegenerateNdcRay { index: usize, dz: Float },

    #[error("radiance field returned {returned} samples for {requested} points")]
    FieldOutputMismatch { requested: usize, returned: usize },

    #[error("inconsistent chunk outputs: {0}")]
    InconsistentChunks(String),

    #[error("image size mismatch: expected {expected} pixels, got {actual}")]
    ImageSizeMismatch { expected: usize, actual: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
