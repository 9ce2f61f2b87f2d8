//! Coarse Depth Sampler.

use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::rng::*;

/// How evenly spaced parameters are mapped to depth.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Spacing {
    /// Linear in depth.
    Linear,

    /// Linear in inverse depth (disparity).
    InverseDepth,
}

/// Picks the coarse depth values along a ray.
#[derive(Copy, Clone, Debug)]
pub struct DepthSampler {
    /// Number of samples per ray.
    pub n_samples: usize,

    /// Depth spacing.
    pub spacing: Spacing,

    /// Jitter each sample within the interval bounded by its neighbours'
    /// midpoints.
    pub stratified: bool,
}

impl DepthSampler {
    /// Create a new `DepthSampler`.
    ///
    /// * `n_samples`  - Number of samples per ray.
    /// * `spacing`    - Depth spacing.
    /// * `stratified` - Jitter the samples.
    pub fn new(n_samples: usize, spacing: Spacing, stratified: bool) -> Result<Self> {
        if n_samples == 0 {
            return Err(Error::InvalidSampleCount(String::from(
                "coarse sample count must be positive",
            )));
        }
        debug!("Depth sampler: {n_samples} samples, {spacing:?} spacing, stratified {stratified}");
        Ok(Self {
            n_samples,
            spacing,
            stratified,
        })
    }

    /// Returns an ascending sequence of `n_samples` depths in `[near, far]`.
    /// One uniform value is drawn from `rng` per sample when stratified.
    ///
    /// * `near` - Near bound.
    /// * `far`  - Far bound.
    /// * `rng`  - Random number generator.
    pub fn sample(&self, near: Float, far: Float, rng: &mut RNG) -> Vec<Float> {
        let t_vals = linspace(self.n_samples);

        let z_vals: Vec<Float> = match self.spacing {
            Spacing::Linear => t_vals.iter().map(|t| near + (far - near) * t).collect(),
            Spacing::InverseDepth => {
                let (inv_near, inv_far) = (1.0 / near, 1.0 / far);
                t_vals
                    .iter()
                    .map(|t| 1.0 / (inv_near + (inv_far - inv_near) * t))
                    .collect()
            }
        };

        let z_vals = if self.stratified {
            stratify(&z_vals, rng)
        } else {
            z_vals
        };

        z_vals.into_iter().map(|z| clamp(z, near, far)).collect()
    }
}

/// Returns the midpoints between consecutive depths.
///
/// * `z_vals` - Ascending depths.
pub fn midpoints(z_vals: &[Float]) -> Vec<Float> {
    z_vals.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Moves each depth to a uniformly random position between the midpoints to
/// its neighbours. The first and last depths are bounded by themselves.
fn stratify(z_vals: &[Float], rng: &mut RNG) -> Vec<Float> {
    let n = z_vals.len();
    if n == 0 {
        return vec![];
    }

    let mids = midpoints(z_vals);
    (0..n)
        .map(|i| {
            let lower = if i == 0 { z_vals[0] } else { mids[i - 1] };
            let upper = if i == n - 1 { z_vals[n - 1] } else { mids[i] };
            lower + (upper - lower) * rng.uniform_float()
        })
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
