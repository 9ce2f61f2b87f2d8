//! Camera-to-world transforms

use super::{Float, Point3f, Vector3f};

/// A rigid 3×4 camera-to-world transform `[R | t]`. Camera space looks down
/// its -z axis with +y up and +x to the right.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// Row-major matrix entries.
    pub m: [[Float; 4]; 3],
}

impl Default for Transform {
    /// Returns the identity transform.
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from 3 rows of 4 values.
    ///
    /// * `m` - Row-major matrix entries.
    pub fn new(m: [[Float; 4]; 3]) -> Self {
        Self { m }
    }

    /// Returns the identity transform.
    pub fn identity() -> Self {
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Returns a pure translation.
    ///
    /// * `delta` - The translation.
    pub fn translate(delta: &Vector3f) -> Self {
        Self::new([
            [1.0, 0.0, 0.0, delta.x],
            [0.0, 1.0, 0.0, delta.y],
            [0.0, 0.0, 1.0, delta.z],
        ])
    }

    /// Returns a camera-to-world transform for a camera at `pos` looking at
    /// `look`.
    ///
    /// * `pos`  - Camera position.
    /// * `look` - The point the camera looks at.
    /// * `up`   - Up vector.
    #[rustfmt::skip]
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Self {
        let dir = (*look - *pos).normalize();
        let right = dir.cross(&up.normalize()).normalize();
        let new_up = right.cross(&dir);

        // Camera looks down -z so the third column is the backward vector.
        Self::new([
            [right.x, new_up.x, -dir.x, pos.x],
            [right.y, new_up.y, -dir.y, pos.y],
            [right.z, new_up.z, -dir.z, pos.z],
        ])
    }

    /// Returns the camera position in world space.
    pub fn translation(&self) -> Point3f {
        Point3f::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Rotates a camera-space vector into world space.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Maps a camera-space point into world space.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        self.translation() + self.transform_vector(&Vector3f::from(*p))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
