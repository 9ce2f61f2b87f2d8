//! Sphere Field

use nerf_core::common::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use nerf_core::spectrum::*;

/// A solid colored ball in otherwise empty space. When view directions are
/// supplied the color brightens on the side of the ball facing the viewer.
#[derive(Copy, Clone, Debug)]
pub struct SphereField {
    /// Center of the ball.
    pub center: Point3f,

    /// Radius of the ball.
    pub radius: Float,

    /// Color logits inside the ball.
    rgb: [Float; 3],

    /// Density inside the ball.
    pub density: Float,
}

impl SphereField {
    /// Create a new `SphereField`.
    ///
    /// * `center`  - Center of the ball.
    /// * `radius`  - Radius of the ball.
    /// * `color`   - Color in (0, 1).
    /// * `density` - Density inside the ball.
    pub fn new(center: Point3f, radius: Float, color: Spectrum, density: Float) -> Self {
        Self {
            center,
            radius,
            rgb: color.map(logit).to_rgb(),
            density,
        }
    }

    /// Returns the raw sample at `p` seen along `view_dir`.
    ///
    /// * `p`        - Position.
    /// * `view_dir` - Optional unit view direction.
    fn evaluate(&self, p: &Point3f, view_dir: Option<&Vector3f>) -> RawSample {
        let offset = *p - self.center;
        if offset.length_squared() > self.radius * self.radius {
            return RawSample::new([0.0; 3], 0.0);
        }

        let shade = match view_dir {
            Some(w) if offset.length_squared() > 0.0 => -w.dot(&offset.normalize()),
            _ => 0.0,
        };
        RawSample::new(
            [self.rgb[0] + shade, self.rgb[1] + shade, self.rgb[2] + shade],
            self.density,
        )
    }
}

impl RadianceField for SphereField {
    /// Returns the ball's color and density inside the radius and an empty
    /// sample outside.
    ///
    /// * `positions` - Sample positions.
    /// * `view_dirs` - Optional unit view directions.
    fn query(&self, positions: &[Point3f], view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
        match view_dirs {
            Some(dirs) => positions
                .iter()
                .zip(dirs.iter())
                .map(|(p, w)| self.evaluate(p, Some(w)))
                .collect(),
            None => positions.iter().map(|p| self.evaluate(p, None)).collect(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn red_ball() -> SphereField {
        SphereField::new(Point3f::zero(), 1.0, Spectrum::from_rgb(0.9, 0.1, 0.1), 50.0)
    }

    #[test]
    fn inside_and_outside() {
        let f = red_ball();
        let out = f.query(&[Point3f::zero(), Point3f::new(0.0, 2.0, 0.0)], None);
        assert_eq!(out[0].sigma, 50.0);
        assert!(approx_eq!(f32, sigmoid(out[0].rgb[0]), 0.9, epsilon = 1e-5));
        assert_eq!(out[1], RawSample::new([0.0; 3], 0.0));
    }

    #[test]
    fn facing_side_is_brighter() {
        let f = red_ball();
        let w = Vector3f::new(0.0, 0.0, -1.0);
        let front = Point3f::new(0.0, 0.0, 0.9);
        let back = Point3f::new(0.0, 0.0, -0.9);
        let out = f.query(&[front, back], Some(&[w, w]));
        assert!(out[0].rgb[0] > out[1].rgb[0]);
    }
}
