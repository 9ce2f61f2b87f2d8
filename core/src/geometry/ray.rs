//! Rays

use super::{Float, Point3f, Vector3f};
use crate::error::*;

/// Number of scalars in a ray record without a view direction.
pub const RAY_RECORD_LEN: usize = 8;

/// Number of scalars in a ray record carrying a unit view direction.
pub const RAY_RECORD_LEN_WITH_VIEW_DIR: usize = 11;

/// A camera ray segment queried for radiance between `near` and `far`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction. Not normalized; sample depths are measured in units of its
    /// length.
    pub d: Vector3f,

    /// Nearest depth sampled along the ray.
    pub near: Float,

    /// Farthest depth sampled along the ray.
    pub far: Float,

    /// Unit viewing direction handed to the radiance field, if view
    /// dependence is enabled.
    pub view_dir: Option<Vector3f>,
}

impl Ray {
    /// Returns a ray without a view direction.
    ///
    /// * `o`    - Origin.
    /// * `d`    - Direction.
    /// * `near` - Nearest depth.
    /// * `far`  - Farthest depth.
    pub fn new(o: Point3f, d: Vector3f, near: Float, far: Float) -> Self {
        Self {
            o,
            d,
            near,
            far,
            view_dir: None,
        }
    }

    /// Returns the ray with the given view direction attached.
    ///
    /// * `view_dir` - Unit viewing direction.
    pub fn with_view_dir(self, view_dir: Vector3f) -> Self {
        Self {
            view_dir: Some(view_dir),
            ..self
        }
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.near.is_nan() || self.far.is_nan()
    }

    /// Get position along the ray at given depth.
    ///
    /// * `t` - Depth to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Flattens the ray into its record layout: origin, direction, near, far
    /// and, when present, the view direction.
    pub fn to_record(&self) -> Vec<Float> {
        let mut record = Vec::with_capacity(RAY_RECORD_LEN_WITH_VIEW_DIR);
        record.extend_from_slice(&[self.o.x, self.o.y, self.o.z]);
        record.extend_from_slice(&[self.d.x, self.d.y, self.d.z]);
        record.extend_from_slice(&[self.near, self.far]);
        if let Some(v) = self.view_dir {
            record.extend_from_slice(&[v.x, v.y, v.z]);
        }
        record
    }

    /// Rebuilds a ray from its 8 or 11 scalar record.
    ///
    /// * `record` - The ray record.
    pub fn from_record(record: &[Float]) -> Result<Self> {
        if record.len() != RAY_RECORD_LEN && record.len() != RAY_RECORD_LEN_WITH_VIEW_DIR {
            return Err(Error::InvalidRayRecord(record.len()));
        }

        let ray = Self::new(
            Point3f::new(record[0], record[1], record[2]),
            Vector3f::new(record[3], record[4], record[5]),
            record[6],
            record[7],
        );
        if record.len() == RAY_RECORD_LEN_WITH_VIEW_DIR {
            Ok(ray.with_view_dir(Vector3f::new(record[8], record[9], record[10])))
        } else {
            Ok(ray)
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
#[macro_use]
mod tests {
    use super::super::{Point3, Vector3};
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn has_nans() {
        let point = Point3::new(0.0, 0.0, 0.0);
        let vector = Vector3::new(1.0, 0.0, 0.0);
        let nan_point = Point3::new(f32::NAN, 0.0, 0.0);

        assert!(Ray::new(nan_point, vector, 0.0, 1.0).has_nans());
        assert!(Ray::new(point, vector, f32::NAN, 1.0).has_nans());
        assert!(!Ray::new(point, vector, 0.0, 1.0).has_nans());
    }

    #[test]
    fn record_layout() {
        let r = Ray::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            0.5,
            7.0,
        );
        assert_eq!(r.to_record(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.5, 7.0]);

        let r = r.with_view_dir(Vector3::new(0.0, 0.0, 1.0));
        let record = r.to_record();
        assert_eq!(record.len(), RAY_RECORD_LEN_WITH_VIEW_DIR);
        assert_eq!(Ray::from_record(&record).unwrap(), r);
    }

    #[test]
    fn record_of_wrong_length_is_rejected() {
        assert!(matches!(
            Ray::from_record(&[0.0; 9]),
            Err(Error::InvalidRayRecord(9))
        ));
    }

    // Define some properties for tests.
    prop_range!(range_f32, f32, -100.0..100.0f32);

    prop_point3!(
        point3_f32,
        f32,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    prop_vector3!(
        vector3_f32,
        f32,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn at_f32(o in point3_f32(), d in vector3_f32(), t in range_f32()) {
            let r = Ray::new(o, d, 0.0, 1.0);
            prop_assert_eq!(r.at(t), o + d * t);
        }
    }
}
