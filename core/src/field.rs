//! Radiance Field

use crate::common::*;
use crate::geometry::*;

/// Raw output of a radiance field at one point: three color logits and one
/// density logit. Produced fresh for each query and never cached.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RawSample {
    /// Color logits; squashed into (0, 1) by the integrator.
    pub rgb: [Float; 3],

    /// Density logit; rectified by the integrator.
    pub sigma: Float,
}

impl RawSample {
    /// Create a new raw sample.
    ///
    /// * `rgb`   - Color logits.
    /// * `sigma` - Density logit.
    pub fn new(rgb: [Float; 3], sigma: Float) -> Self {
        Self { rgb, sigma }
    }

    /// Returns true if all four values are finite.
    pub fn is_finite(&self) -> bool {
        self.rgb.iter().all(|v| v.is_finite()) && self.sigma.is_finite()
    }
}

/// A continuous volumetric scene representation. The renderer only ever
/// calls `query` and expects it to be pure: the same inputs always give the
/// same outputs, whatever the batch size.
pub trait RadianceField {
    /// Evaluates the field at a batch of points and returns one raw sample
    /// per point, in input order.
    ///
    /// * `positions` - World-space sample positions.
    /// * `view_dirs` - Unit view directions, one per position, when view
    ///                 dependence is enabled.
    fn query(&self, positions: &[Point3f], view_dirs: Option<&[Vector3f]>) -> Vec<RawSample>;
}

