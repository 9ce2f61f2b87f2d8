//! Ray Batches

use super::{Float, Point3f, Ray, Vector3f};
use crate::error::*;

/// Near/far bounds for a batch of rays.
#[derive(Clone, Debug, PartialEq)]
pub enum Bounds {
    /// The same bounds for every ray.
    Uniform { near: Float, far: Float },

    /// One `(near, far)` pair per ray.
    PerRay(Vec<(Float, Float)>),
}

impl Bounds {
    /// Returns the bounds for the ray at `index`.
    ///
    /// * `index` - Ray index.
    pub fn get(&self, index: usize) -> (Float, Float) {
        match self {
            Self::Uniform { near, far } => (*near, *far),
            Self::PerRay(b) => b[index],
        }
    }

    /// Checks that these bounds can be applied to `n_rays` rays.
    ///
    /// * `n_rays` - Number of rays in the batch.
    fn check_len(&self, n_rays: usize) -> Result<()> {
        match self {
            Self::PerRay(b) if b.len() != n_rays => Err(Error::BoundsCountMismatch {
                rays: n_rays,
                bounds: b.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// An ordered batch of rays. Output `i` of any render always belongs to ray
/// `i` of its batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RayBatch {
    /// The rays.
    pub rays: Vec<Ray>,
}

impl RayBatch {
    /// Create a batch from already built rays.
    ///
    /// * `rays` - The rays.
    pub fn new(rays: Vec<Ray>) -> Self {
        Self { rays }
    }

    /// Create a batch from separate origin and direction arrays.
    ///
    /// * `origins`    - Ray origins.
    /// * `directions` - Ray directions.
    /// * `bounds`     - Near/far bounds.
    /// * `view_dirs`  - Optional unit view directions, one per ray.
    pub fn from_parts(
        origins: &[Point3f],
        directions: &[Vector3f],
        bounds: &Bounds,
        view_dirs: Option<&[Vector3f]>,
    ) -> Result<Self> {
        if origins.len() != directions.len() {
            return Err(Error::RayCountMismatch {
                origins: origins.len(),
                directions: directions.len(),
            });
        }
        if let Some(v) = view_dirs {
            if v.len() != directions.len() {
                return Err(Error::RayCountMismatch {
                    origins: origins.len(),
                    directions: v.len(),
                });
            }
        }
        bounds.check_len(origins.len())?;

        let rays = origins
            .iter()
            .zip(directions.iter())
            .enumerate()
            .map(|(i, (o, d))| {
                let (near, far) = bounds.get(i);
                let ray = Ray::new(*o, *d, near, far);
                match view_dirs {
                    Some(v) => ray.with_view_dir(v[i]),
                    None => ray,
                }
            })
            .collect();

        Ok(Self { rays })
    }

    /// Decode a batch from concatenated ray records.
    ///
    /// * `records`    - Flattened ray records.
    /// * `record_len` - Length of each record (8 or 11).
    pub fn from_records(records: &[Float], record_len: usize) -> Result<Self> {
        if record_len == 0 || records.len() % record_len != 0 {
            return Err(Error::InvalidRayRecord(record_len));
        }
        let rays = records
            .chunks(record_len)
            .map(Ray::from_record)
            .collect::<Result<Vec<Ray>>>()?;
        Ok(Self { rays })
    }

    /// Encode the batch as concatenated ray records.
    pub fn to_records(&self) -> Vec<Float> {
        self.rays.iter().flat_map(|r| r.to_record()).collect()
    }

    /// Returns the number of rays.
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    /// Returns true if the batch has no rays.
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Verify every ray has usable bounds.
    ///
    /// * `inverse_depth` - Whether samples will be spaced linearly in inverse
    ///                     depth, which additionally requires `near > 0`.
    pub fn validate(&self, inverse_depth: bool) -> Result<()> {
        for (index, ray) in self.rays.iter().enumerate() {
            let (near, far) = (ray.near, ray.far);
            let invalid = !near.is_finite()
                || !far.is_finite()
                || near >= far
                || (inverse_depth && near <= 0.0);
            if invalid {
                return Err(Error::InvalidBounds { index, near, far });
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(n: usize) -> Vec<Point3f> {
        (0..n).map(|i| Point3f::new(i as Float, 0.0, 0.0)).collect()
    }

    fn directions(n: usize) -> Vec<Vector3f> {
        vec![Vector3f::new(0.0, 0.0, -1.0); n]
    }

    #[test]
    fn from_parts_keeps_order() {
        let bounds = Bounds::PerRay(vec![(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)]);
        let batch = RayBatch::from_parts(&origins(3), &directions(3), &bounds, None).unwrap();
        assert_eq!(batch.len(), 3);
        for (i, ray) in batch.rays.iter().enumerate() {
            assert_eq!(ray.o.x, i as Float);
            assert_eq!(ray.near, 1.0 + 2.0 * i as Float);
            assert_eq!(ray.far, 2.0 + 2.0 * i as Float);
        }
    }

    #[test]
    fn mismatched_origins_and_directions_fail() {
        let bounds = Bounds::Uniform { near: 1.0, far: 2.0 };
        let err = RayBatch::from_parts(&origins(3), &directions(2), &bounds, None).unwrap_err();
        assert!(matches!(
            err,
            Error::RayCountMismatch {
                origins: 3,
                directions: 2
            }
        ));
    }

    #[test]
    fn mismatched_bounds_fail() {
        let bounds = Bounds::PerRay(vec![(1.0, 2.0)]);
        let err = RayBatch::from_parts(&origins(2), &directions(2), &bounds, None).unwrap_err();
        assert!(matches!(err, Error::BoundsCountMismatch { rays: 2, bounds: 1 }));
    }

    #[test]
    fn near_not_below_far_is_rejected() {
        let bounds = Bounds::Uniform { near: 2.0, far: 2.0 };
        let batch = RayBatch::from_parts(&origins(1), &directions(1), &bounds, None).unwrap();
        assert!(matches!(
            batch.validate(false),
            Err(Error::InvalidBounds { index: 0, .. })
        ));
    }

    #[test]
    fn inverse_depth_needs_positive_near() {
        let bounds = Bounds::Uniform { near: 0.0, far: 2.0 };
        let batch = RayBatch::from_parts(&origins(1), &directions(1), &bounds, None).unwrap();
        assert!(batch.validate(false).is_ok());
        assert!(batch.validate(true).is_err());
    }

    #[test]
    fn records_round_trip_through_batch() {
        let bounds = Bounds::Uniform { near: 1.0, far: 2.0 };
        let views = directions(2);
        let batch =
            RayBatch::from_parts(&origins(2), &directions(2), &bounds, Some(&views)).unwrap();
        let records = batch.to_records();
        assert_eq!(records.len(), 22);
        assert_eq!(RayBatch::from_records(&records, 11).unwrap(), batch);
        assert!(RayBatch::from_records(&records, 8).is_err());
    }
}
