//! Volume Integrator

use nerf_core::common::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use nerf_core::rng::*;
use nerf_core::spectrum::*;

/// Composited outputs of one ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    /// Composited color.
    pub rgb: Spectrum,

    /// Inverse of the expected depth.
    pub disparity: Float,

    /// Accumulated opacity.
    pub acc: Float,

    /// Expected depth.
    pub depth: Float,

    /// Compositing weight of each sample.
    pub weights: Vec<Float>,
}

/// Turns raw field samples along a ray into a pixel value with the discrete
/// emission-absorption volume rendering integral.
#[derive(Copy, Clone, Debug, Default)]
pub struct VolumeIntegrator {
    /// Composite over a white backdrop.
    pub white_background: bool,

    /// Standard deviation of Gaussian noise added to density logits.
    pub raw_noise_std: Float,
}

impl VolumeIntegrator {
    /// Create a new `VolumeIntegrator`.
    ///
    /// * `white_background` - Composite over a white backdrop.
    /// * `raw_noise_std`    - Standard deviation of density noise; 0 disables.
    pub fn new(white_background: bool, raw_noise_std: Float) -> Self {
        Self {
            white_background,
            raw_noise_std,
        }
    }

    /// Composites the samples of one ray. When noise is enabled one normal
    /// draw per sample is taken from `rng`.
    ///
    /// * `raw`    - Raw samples in ascending depth order.
    /// * `z_vals` - Sample depths.
    /// * `d`      - Ray direction; its length converts depth steps to distance.
    /// * `rng`    - Random number generator.
    pub fn integrate(&self, raw: &[RawSample], z_vals: &[Float], d: &Vector3f, rng: &mut RNG) -> Composite {
        let n = min(raw.len(), z_vals.len());
        let d_len = d.length();

        let mut rgb = Spectrum::default();
        let mut acc = 0.0;
        let mut depth = 0.0;
        let mut weights = Vec::with_capacity(n);

        // Transmittance up to the current sample.
        let mut tr: Float = 1.0;
        for i in 0..n {
            let step = if i + 1 < n {
                z_vals[i + 1] - z_vals[i]
            } else {
                FAR_DISTANCE
            };
            let dist = step * d_len;

            let noise = if self.raw_noise_std > 0.0 {
                rng.normal_float() * self.raw_noise_std
            } else {
                0.0
            };
            let sigma = relu(raw[i].sigma + noise);
            let alpha = 1.0 - (-sigma * dist).exp();

            let w = alpha * tr;
            tr *= 1.0 - alpha + EPSILON;

            let c = Spectrum::from(raw[i].rgb).map(sigmoid);
            rgb += c * w;
            acc += w;
            depth += w * z_vals[i];
            weights.push(w);
        }

        let disparity = if acc > 0.0 {
            1.0 / max(EPSILON, depth / acc)
        } else {
            1.0 / EPSILON
        };

        if self.white_background {
            rgb += Spectrum::new(1.0 - acc);
        }

        Composite {
            rgb,
            disparity,
            acc,
            depth,
            weights,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
