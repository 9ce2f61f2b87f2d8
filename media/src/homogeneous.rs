//! Homogeneous Field

use nerf_core::common::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use nerf_core::spectrum::*;

/// A field with the same color and density everywhere in space.
#[derive(Copy, Clone, Debug)]
pub struct HomogeneousField {
    /// The raw sample returned for every point.
    raw: RawSample,
}

impl HomogeneousField {
    /// Create a new `HomogeneousField` from raw logits.
    ///
    /// * `raw` - Raw sample returned for every point.
    pub fn new(raw: RawSample) -> Self {
        Self { raw }
    }

    /// Create a new `HomogeneousField` from a color in (0, 1) and a
    /// non-negative density.
    ///
    /// * `color`   - Color.
    /// * `density` - Density.
    pub fn from_color(color: Spectrum, density: Float) -> Self {
        let rgb = color.map(logit).to_rgb();
        Self::new(RawSample::new(rgb, density))
    }

    /// Returns a field that is empty everywhere.
    pub fn empty() -> Self {
        Self::new(RawSample::new([0.0; 3], 0.0))
    }
}

impl RadianceField for HomogeneousField {
    /// Returns the same raw sample for every position.
    ///
    /// * `positions` - Sample positions.
    /// * `_view_dirs` - Ignored.
    fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
        vec![self.raw; positions.len()]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn one_sample_per_position() {
        let f = HomogeneousField::empty();
        let out = f.query(&[Point3f::zero(); 7], None);
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|r| r.sigma == 0.0));
    }

    #[test]
    fn color_round_trips_through_logits() {
        let f = HomogeneousField::from_color(Spectrum::from_rgb(0.25, 0.5, 0.75), 2.0);
        let raw = f.query(&[Point3f::zero()], None)[0];
        assert!(approx_eq!(f32, sigmoid(raw.rgb[0]), 0.25, epsilon = 1e-5));
        assert!(approx_eq!(f32, sigmoid(raw.rgb[1]), 0.5, epsilon = 1e-5));
        assert!(approx_eq!(f32, sigmoid(raw.rgb[2]), 0.75, epsilon = 1e-5));
        assert_eq!(raw.sigma, 2.0);
    }
}
