//! Voxel Grid Field

use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::geometry::*;

/// A field stored as raw samples at a regular 3D grid of positions inside an
/// axis-aligned box. Samples are trilinearly interpolated to compute the raw
/// values at positions between grid points. Positions outside the box are
/// empty.
pub struct GridField {
    /// Grid size in x-direction.
    nx: usize,

    /// Grid size in y-direction.
    ny: usize,

    /// Grid size in z-direction.
    nz: usize,

    /// Minimum corner of the box.
    p_min: Point3f,

    /// Maximum corner of the box.
    p_max: Point3f,

    /// Raw samples in x-fastest order.
    values: Vec<RawSample>,
}

impl GridField {
    /// Create a new `GridField`.
    ///
    /// * `nx`     - Grid size in x-direction.
    /// * `ny`     - Grid size in y-direction.
    /// * `nz`     - Grid size in z-direction.
    /// * `p_min`  - Minimum corner of the box.
    /// * `p_max`  - Maximum corner of the box.
    /// * `values` - Raw samples in x-fastest order.
    pub fn new(
        nx: usize,
        ny: usize,
        nz: usize,
        p_min: Point3f,
        p_max: Point3f,
        values: Vec<RawSample>,
    ) -> Result<Self> {
        let expected = nx * ny * nz;
        if expected == 0 || values.len() != expected {
            return Err(Error::InvalidGrid {
                nx,
                ny,
                nz,
                expected,
                actual: values.len(),
            });
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            warn!("GridField value {} is not finite", bad);
        }

        debug!("GridField {}x{}x{} over {:?} - {:?}", nx, ny, nz, p_min, p_max);
        Ok(Self {
            nx,
            ny,
            nz,
            p_min,
            p_max,
            values,
        })
    }

    /// Create a new `GridField` by evaluating `f` at every grid point.
    ///
    /// * `n`     - Grid size along each axis.
    /// * `p_min` - Minimum corner of the box.
    /// * `p_max` - Maximum corner of the box.
    /// * `f`     - Function giving the raw sample at a world-space position.
    pub fn from_fn<F>(n: usize, p_min: Point3f, p_max: Point3f, f: F) -> Result<Self>
    where
        F: Fn(&Point3f) -> RawSample,
    {
        let extent = p_max - p_min;
        let mut values = Vec::with_capacity(n * n * n);
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    // Grid points sit at voxel centers.
                    let p = Point3f::new(
                        p_min.x + extent.x * (x as Float + 0.5) / n as Float,
                        p_min.y + extent.y * (y as Float + 0.5) / n as Float,
                        p_min.z + extent.z * (z as Float + 0.5) / n as Float,
                    );
                    values.push(f(&p));
                }
            }
        }
        Self::new(n, n, n, p_min, p_max, values)
    }

    /// Reconstruct the raw sample at the given world-space position.
    ///
    /// * `p` - Sample position.
    fn raw(&self, p: &Point3f) -> RawSample {
        let extent = self.p_max - self.p_min;
        let local = *p - self.p_min;
        let u = [local.x / extent.x, local.y / extent.y, local.z / extent.z];
        if u.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return RawSample::default();
        }

        // Compute voxel coordinates and offsets for `p`.
        let ps = [
            u[0] * self.nx as Float - 0.5,
            u[1] * self.ny as Float - 0.5,
            u[2] * self.nz as Float - 0.5,
        ];
        let pi = [
            ps[0].floor() as isize,
            ps[1].floor() as isize,
            ps[2].floor() as isize,
        ];
        let d = [
            ps[0] - pi[0] as Float,
            ps[1] - pi[1] as Float,
            ps[2] - pi[2] as Float,
        ];

        // Trilinearly interpolate to compute the local sample.
        let at = |dx: isize, dy: isize, dz: isize| self.v(pi[0] + dx, pi[1] + dy, pi[2] + dz);
        let d00 = lerp_raw(d[0], &at(0, 0, 0), &at(1, 0, 0));
        let d10 = lerp_raw(d[0], &at(0, 1, 0), &at(1, 1, 0));
        let d01 = lerp_raw(d[0], &at(0, 0, 1), &at(1, 0, 1));
        let d11 = lerp_raw(d[0], &at(0, 1, 1), &at(1, 1, 1));
        let d0 = lerp_raw(d[1], &d00, &d10);
        let d1 = lerp_raw(d[1], &d01, &d11);
        lerp_raw(d[2], &d0, &d1)
    }

    /// Returns the raw sample at the given integer grid position, clamped to
    /// the grid.
    fn v(&self, x: isize, y: isize, z: isize) -> RawSample {
        let x = clamp(x, 0, self.nx as isize - 1) as usize;
        let y = clamp(y, 0, self.ny as isize - 1) as usize;
        let z = clamp(z, 0, self.nz as isize - 1) as usize;
        self.values[(z * self.ny + y) * self.nx + x]
    }
}

/// Linearly interpolates every component of two raw samples.
fn lerp_raw(t: Float, a: &RawSample, b: &RawSample) -> RawSample {
    RawSample::new(
        [
            lerp(t, a.rgb[0], b.rgb[0]),
            lerp(t, a.rgb[1], b.rgb[1]),
            lerp(t, a.rgb[2], b.rgb[2]),
        ],
        lerp(t, a.sigma, b.sigma),
    )
}

impl RadianceField for GridField {
    /// Returns the interpolated raw samples. View directions are ignored.
    ///
    /// * `positions`  - Sample positions.
    /// * `_view_dirs` - Ignored.
    fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
        positions.iter().map(|p| self.raw(p)).collect()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
