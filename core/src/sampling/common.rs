//! Common sampling functions.

use crate::common::*;
use crate::rng::*;

/// Generate stratified 1D samples in [0, 1). Without jitter every sample sits
/// in the middle of its stratum.
///
/// * `rng`       - Random number generator.
/// * `n_samples` - Number of samples.
/// * `jitter`    - Jitter the samples.
pub fn stratified_sample_1d(rng: &mut RNG, n_samples: usize, jitter: bool) -> Vec<Float> {
    let inv_n_samples = 1.0 / n_samples as Float;

    (0..n_samples)
        .map(|i| {
            let delta = if jitter { rng.uniform_float() } else { 0.5 };
            min((i as Float + delta) * inv_n_samples, ONE_MINUS_EPSILON)
        })
        .collect::<Vec<Float>>()
}

/// Generate independent uniform 1D samples in [0, 1).
///
/// * `rng`       - Random number generator.
/// * `n_samples` - Number of samples.
pub fn uniform_sample_1d(rng: &mut RNG, n_samples: usize) -> Vec<Float> {
    (0..n_samples).map(|_| rng.uniform_float()).collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unjittered_samples_are_stratum_centers() {
        let mut rng = RNG::new(0);
        assert_eq!(
            stratified_sample_1d(&mut rng, 4, false),
            vec![0.125, 0.375, 0.625, 0.875]
        );
    }

    #[test]
    fn jittered_samples_stay_in_their_stratum() {
        let mut rng = RNG::new(3);
        let n = 16;
        for (i, u) in stratified_sample_1d(&mut rng, n, true).iter().enumerate() {
            assert!(*u >= i as Float / n as Float);
            assert!(*u < (i + 1) as Float / n as Float);
        }
    }

    #[test]
    fn uniform_samples_in_unit_interval() {
        let mut rng = RNG::new(9);
        assert!(uniform_sample_1d(&mut rng, 100)
            .iter()
            .all(|u| (0.0..1.0).contains(u)));
    }
}
