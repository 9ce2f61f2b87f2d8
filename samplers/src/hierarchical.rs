//! Hierarchical Importance Sampler.

use super::midpoints;
use itertools::Itertools;
use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::rng::*;
use nerf_core::sampling::*;

/// Draws additional depths along a ray where the coarse pass found most of
/// the compositing weight.
#[derive(Copy, Clone, Debug)]
pub struct ImportanceSampler {
    /// Number of new depths per ray.
    pub n_importance: usize,

    /// Use evenly spaced CDF queries instead of independent uniform draws.
    pub deterministic: bool,
}

impl ImportanceSampler {
    /// Create a new `ImportanceSampler`.
    ///
    /// * `n_importance`  - Number of new depths per ray.
    /// * `deterministic` - Use evenly spaced CDF queries.
    pub fn new(n_importance: usize, deterministic: bool) -> Self {
        Self {
            n_importance,
            deterministic,
        }
    }

    /// Returns `n_importance` depths drawn by inverse-transform sampling of
    /// the piecewise-constant density defined over the midpoints of `z_vals`.
    /// The first and last weights are ignored.
    ///
    /// The returned depths are plain values; nothing about the choice of
    /// where to sample is propagated back to the weights.
    ///
    /// * `z_vals`  - Ascending coarse depths.
    /// * `weights` - Coarse compositing weights, one per depth.
    /// * `rng`     - Random number generator.
    pub fn sample(&self, z_vals: &[Float], weights: &[Float], rng: &mut RNG) -> Result<Vec<Float>> {
        let n = z_vals.len();
        if n < 3 {
            return Err(Error::InvalidSampleCount(format!(
                "importance sampling needs at least 3 coarse samples, got {n}"
            )));
        }
        if weights.len() != n {
            return Err(Error::InvalidSampleCount(format!(
                "{} weights for {} depths",
                weights.len(),
                n
            )));
        }
        if self.n_importance == 0 {
            return Ok(vec![]);
        }

        let bins = midpoints(z_vals);
        let interior = &weights[1..n - 1];
        if interior.iter().all(|w| *w <= 0.0) {
            trace!("No coarse weight on ray interior; importance samples are uniform");
        }
        let distrib = Distribution1D::new(interior);

        let u = if self.deterministic {
            stratified_sample_1d(rng, self.n_importance, false)
        } else {
            uniform_sample_1d(rng, self.n_importance)
        };

        let samples = u
            .into_iter()
            .map(|u| {
                let (offset, du) = distrib.sample_continuous(u);
                bins[offset] + du * (bins[offset + 1] - bins[offset])
            })
            .collect();

        Ok(samples)
    }
}

/// Returns the union of coarse and fine depths sorted ascending. Duplicates
/// are kept.
///
/// * `coarse` - Coarse depths.
/// * `fine`   - Fine depths.
pub fn merge_depths(coarse: &[Float], fine: &[Float]) -> Vec<Float> {
    coarse
        .iter()
        .chain(fine.iter())
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .collect()
}

/// Returns the population standard deviation of `values`, 0 when empty.
///
/// * `values` - The values.
pub fn spread(values: &[Float]) -> Float {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as Float;
    let mean = values.iter().sum::<Float>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<Float>() / n;
    var.sqrt()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    // Six depths give five midpoints and four interior intervals.
    const Z: [Float; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn too_few_coarse_samples() {
        let sampler = ImportanceSampler::new(4, true);
        let r = sampler.sample(&[1.0, 2.0], &[0.5, 0.5], &mut RNG::new(0));
        assert!(matches!(r, Err(Error::InvalidSampleCount(_))));
    }

    #[test]
    fn mismatched_weights() {
        let sampler = ImportanceSampler::new(4, true);
        let r = sampler.sample(&Z, &[0.5; 4], &mut RNG::new(0));
        assert!(r.is_err());
    }

    #[test]
    fn zero_importance_gives_nothing() {
        let sampler = ImportanceSampler::new(0, false);
        assert!(sampler.sample(&Z, &[0.1; 6], &mut RNG::new(0)).unwrap().is_empty());
    }

    #[test]
    fn uniform_weights_deterministic_cover_the_midpoint_range() {
        let sampler = ImportanceSampler::new(4, true);
        let s = sampler.sample(&Z, &[0.0, 1.0, 1.0, 1.0, 1.0, 0.0], &mut RNG::new(0)).unwrap();
        // Bin centers of the CDF land evenly over [0.5, 4.5].
        let expected = [1.0, 2.0, 3.0, 4.0];
        for (a, b) in s.iter().zip(expected.iter()) {
            assert!(approx_eq!(f32, *a, *b, epsilon = 1e-4));
        }
    }

    #[test]
    fn endpoint_weights_are_ignored() {
        let sampler = ImportanceSampler::new(8, true);
        let a = sampler.sample(&Z, &[100.0, 0.0, 0.0, 1.0, 0.0, 100.0], &mut RNG::new(0)).unwrap();
        assert!(a.iter().all(|z| *z >= 2.5 && *z <= 3.5));
    }

    #[test]
    fn merge_keeps_duplicates_sorted() {
        let merged = merge_depths(&[1.0, 2.0, 3.0], &[2.0, 0.5]);
        assert_eq!(merged, vec![0.5, 1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn spread_of_constant_is_zero() {
        assert_eq!(spread(&[2.0; 5]), 0.0);
        assert_eq!(spread(&[]), 0.0);
        assert!(approx_eq!(f32, spread(&[1.0, 3.0]), 1.0));
    }

    proptest! {
        #[test]
        fn concentrated_weights_stay_in_their_interval(
            n_importance in 1usize..256,
            deterministic in any::<bool>(),
            seq in any::<u64>(),
        ) {
            // Interior weights [0, 0, 1, 0]: all mass between midpoints 2.5 and 3.5.
            let weights = [0.3, 0.0, 0.0, 1.0, 0.0, 0.7];
            let sampler = ImportanceSampler::new(n_importance, deterministic);
            let s = sampler.sample(&Z, &weights, &mut RNG::new(seq)).unwrap();

            prop_assert_eq!(s.len(), n_importance);
            prop_assert!(s.iter().all(|z| *z >= 2.5 && *z <= 3.5));
        }

        #[test]
        fn merged_depths_are_sorted(
            fine in prop::collection::vec(0.0f32..5.0f32, 0..32),
        ) {
            let merged = merge_depths(&Z, &fine);
            prop_assert_eq!(merged.len(), Z.len() + fine.len());
            prop_assert!(merged.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
