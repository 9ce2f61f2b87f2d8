//! Normalized Device Coordinates

use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::geometry::*;

/// Smallest depth-axis direction component accepted by the NDC remap.
pub const NDC_MIN_DIRECTION_Z: Float = 1e-6;

/// Remaps forward-facing camera rays into normalized device coordinates.
///
/// Origins are first moved onto the near plane `z = -near`. In the remapped
/// space a parametric depth of 0 lies on the near plane and 1 at infinite
/// camera depth, so sampling `t` in `[0, 1]` covers the whole frustum.
///
/// * `width`      - Image width.
/// * `height`     - Image height.
/// * `focal`      - Focal length in pixels.
/// * `near`       - Near plane distance.
/// * `origins`    - Ray origins in camera-aligned world space.
/// * `directions` - Ray directions.
pub fn ndc_rays(
    width: usize,
    height: usize,
    focal: Float,
    near: Float,
    origins: &[Point3f],
    directions: &[Vector3f],
) -> Result<(Vec<Point3f>, Vec<Vector3f>)> {
    if origins.len() != directions.len() {
        return Err(Error::RayCountMismatch {
            origins: origins.len(),
            directions: directions.len(),
        });
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidImageSize { width, height });
    }

    let sx = -2.0 * focal / width as Float;
    let sy = -2.0 * focal / height as Float;

    let mut ndc_origins = Vec::with_capacity(origins.len());
    let mut ndc_directions = Vec::with_capacity(directions.len());
    for (index, (o, d)) in origins.iter().zip(directions.iter()).enumerate() {
        if !(d.z.abs() >= NDC_MIN_DIRECTION_Z) {
            return Err(Error::DegenerateNdcRay { index, dz: d.z });
        }

        // Shift origin to the near plane.
        let t = -(near + o.z) / d.z;
        let o = *o + *d * t;

        let o_ndc = Point3f::new(sx * o.x / o.z, sy * o.y / o.z, 1.0 + 2.0 * near / o.z);
        let d_ndc = Vector3f::new(
            sx * (d.x / d.z - o.x / o.z),
            sy * (d.y / d.z - o.y / o.z),
            -2.0 * near / o.z,
        );

        ndc_origins.push(o_ndc);
        ndc_directions.push(d_ndc);
    }

    debug!("Remapped {} rays to NDC", ndc_origins.len());
    Ok((ndc_origins, ndc_directions))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
