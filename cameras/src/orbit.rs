//! Orbit Poses

use nerf_core::common::*;
use nerf_core::geometry::*;

/// Returns `n` camera-to-world transforms evenly spaced on a horizontal ring
/// around the world origin, each looking at the origin.
///
/// * `n`         - Number of poses.
/// * `radius`    - Distance from the origin.
/// * `elevation` - Elevation angle in degrees above the xz-plane.
pub fn orbit_poses(n: usize, radius: Float, elevation: Float) -> Vec<Transform> {
    let up = Vector3f::new(0.0, 1.0, 0.0);
    let phi = elevation.to_radians();
    let ring = radius * phi.cos();
    let height = radius * phi.sin();

    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f32::consts::PI * i as Float / n as Float;
            let pos = Point3f::new(ring * theta.sin(), height, ring * theta.cos());
            Transform::look_at(&pos, &Point3f::zero(), &up)
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn poses_sit_on_the_ring_and_face_the_origin() {
        let poses = orbit_poses(6, 4.0, 30.0);
        assert_eq!(poses.len(), 6);
        for pose in poses {
            let pos = pose.translation();
            assert!(approx_eq!(f32, pos.distance(&Point3f::zero()), 4.0, epsilon = 1e-4));

            let forward = pose.transform_vector(&Vector3f::new(0.0, 0.0, -1.0));
            let to_origin = (Point3f::zero() - pos).normalize();
            assert!(approx_eq!(f32, forward.dot(&to_origin), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn zero_poses_is_empty() {
        assert!(orbit_poses(0, 4.0, 0.0).is_empty());
    }
}
