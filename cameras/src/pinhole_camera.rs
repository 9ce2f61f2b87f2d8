//! Pinhole Camera

use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::geometry::*;

/// Pinhole intrinsics in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intrinsics {
    /// Focal length along x.
    pub fx: Float,

    /// Focal length along y.
    pub fy: Float,

    /// Principal point x-coordinate.
    pub cx: Float,

    /// Principal point y-coordinate.
    pub cy: Float,
}

impl Intrinsics {
    /// Create new intrinsics.
    ///
    /// * `fx` - Focal length along x.
    /// * `fy` - Focal length along y.
    /// * `cx` - Principal point x-coordinate.
    /// * `cy` - Principal point y-coordinate.
    pub fn new(fx: Float, fy: Float, cx: Float, cy: Float) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Returns intrinsics with a single focal length and the principal point
    /// at the image center.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    /// * `focal`  - Focal length.
    pub fn from_focal(width: usize, height: usize, focal: Float) -> Self {
        Self::new(focal, focal, 0.5 * width as Float, 0.5 * height as Float)
    }

    /// Returns the intrinsics of the image downsampled by `factor`.
    ///
    /// * `factor` - Downsampling factor.
    pub fn downsample(&self, factor: usize) -> Self {
        let f = factor.max(1) as Float;
        Self::new(self.fx / f, self.fy / f, self.cx / f, self.cy / f)
    }
}

/// A pinhole camera producing one ray per pixel. Pixels are enumerated row by
/// row starting at the top-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinholeCamera {
    /// Image width in pixels.
    pub width: usize,

    /// Image height in pixels.
    pub height: usize,

    /// The intrinsics.
    pub intrinsics: Intrinsics,
}

impl PinholeCamera {
    /// Create a new pinhole camera.
    ///
    /// * `width`      - Image width in pixels.
    /// * `height`     - Image height in pixels.
    /// * `intrinsics` - The intrinsics.
    pub fn new(width: usize, height: usize, intrinsics: Intrinsics) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize { width, height });
        }
        Ok(Self {
            width,
            height,
            intrinsics,
        })
    }

    /// Returns the number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the camera-space direction through pixel `(i, j)`.
    ///
    /// * `i` - Column.
    /// * `j` - Row.
    pub fn camera_direction(&self, i: usize, j: usize) -> Vector3f {
        let k = &self.intrinsics;
        Vector3f::new(
            (i as Float - k.cx) / k.fx,
            -(j as Float - k.cy) / k.fy,
            -1.0,
        )
    }

    /// Returns world-space origins and (unnormalized) directions for every
    /// pixel.
    ///
    /// * `camera_to_world` - The camera pose.
    pub fn generate_rays(&self, camera_to_world: &Transform) -> (Vec<Point3f>, Vec<Vector3f>) {
        let o = camera_to_world.translation();
        let n = self.pixel_count();

        let mut origins = Vec::with_capacity(n);
        let mut directions = Vec::with_capacity(n);
        for j in 0..self.height {
            for i in 0..self.width {
                origins.push(o);
                directions.push(camera_to_world.transform_vector(&self.camera_direction(i, j)));
            }
        }

        trace!("Generated {} rays from camera at {:?}", n, o);
        (origins, directions)
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
    fn zero_sized_image_is_rejected() {
        let k = Intrinsics::from_focal(0, 4, 1.0);
        assert!(PinholeCamera::new(0, 4, k).is_err());
    }

    #[test]
    fn principal_point_looks_down_minus_z() {
        let cam = PinholeCamera::new(4, 2, Intrinsics::from_focal(4, 2, 2.0)).unwrap();
        let (origins, directions) = cam.generate_rays(&Transform::identity());
        assert_eq!(origins.len(), 8);
        assert_eq!(directions.len(), 8);

        // Pixel (2, 1) sits exactly on the principal point.
        assert_eq!(directions[4 + 2], Vector3f::new(0.0, 0.0, -1.0));
        assert!(origins.iter().all(|o| *o == Point3f::zero()));

        // Top-left pixel points left and up.
        let d = directions[0];
        assert!(approx_eq!(f32, d.x, -1.0));
        assert!(approx_eq!(f32, d.y, 0.5));
    }

    #[test]
    fn pose_moves_origins_and_rotates_directions() {
        let cam = PinholeCamera::new(2, 2, Intrinsics::from_focal(2, 2, 1.0)).unwrap();
        let pos = Point3f::new(0.0, 0.0, 5.0);
        let pose = Transform::look_at(&pos, &Point3f::zero(), &Vector3f::new(0.0, 1.0, 0.0));
        let (origins, directions) = cam.generate_rays(&pose);
        assert!(origins.iter().all(|o| *o == pos));
        assert!(directions.iter().all(|d| d.z < 0.0));
    }

    #[test]
    fn downsample_scales_everything() {
        let k = Intrinsics::new(100.0, 80.0, 50.0, 40.0).downsample(2);
        assert_eq!(k, Intrinsics::new(50.0, 40.0, 25.0, 20.0));
    }
}
