//! Image metrics.

use crate::common::*;
use crate::error::*;
use crate::spectrum::*;

/// Returns the mean squared error between two images over all channels.
///
/// * `rendered` - Rendered pixels.
/// * `target`   - Reference pixels.
pub fn img2mse(rendered: &[Spectrum], target: &[Spectrum]) -> Result<Float> {
    if rendered.len() != target.len() {
        return Err(Error::ImageSizeMismatch {
            expected: target.len(),
            actual: rendered.len(),
        });
    }
    if rendered.is_empty() {
        return Ok(0.0);
    }

    let sum: f64 = rendered
        .iter()
        .zip(target.iter())
        .map(|(a, b)| {
            let d = *a - *b;
            (0..RGB_SAMPLES).map(|i| (d[i] * d[i]) as f64).sum::<f64>()
        })
        .sum();
    Ok((sum / (rendered.len() * RGB_SAMPLES) as f64) as Float)
}

/// Converts a mean squared error into peak signal-to-noise ratio in decibels
/// for signals in [0, 1].
///
/// * `mse` - Mean squared error.
pub fn mse2psnr(mse: Float) -> Float {
    -10.0 * mse.log10()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn mse_of_identical_images_is_zero() {
        let a = vec![Spectrum::from_rgb(0.25, 0.5, 0.75); 4];
        assert_eq!(img2mse(&a, &a).unwrap(), 0.0);
        assert!(mse2psnr(0.0).is_infinite());
    }

    #[test]
    fn mse_and_psnr_values() {
        let a = vec![Spectrum::new(0.0); 2];
        let b = vec![Spectrum::new(0.1); 2];
        let mse = img2mse(&a, &b).unwrap();
        assert!(approx_eq!(f32, mse, 0.01, epsilon = 1e-6));
        assert!(approx_eq!(f32, mse2psnr(mse), 20.0, epsilon = 1e-3));
    }

    #[test]
    fn mismatched_sizes_fail() {
        let a = vec![Spectrum::new(0.0); 2];
        let b = vec![Spectrum::new(0.0); 3];
        assert!(img2mse(&a, &b).is_err());
    }
}
