//! Image I/O

use crate::common::*;
use crate::error::*;
use crate::spectrum::*;
use image::{ImageBuffer, ImageFormat, Luma, Rgb};
use std::path::Path;

/// Convert a floating point value to an 8-bit channel value by clamping to
/// [0, 1] and scaling to [0, 255].
///
/// * `v` - The value.
#[inline]
pub fn to8b(v: Float) -> u8 {
    (255.0 * clamp(v, 0.0, 1.0)) as u8
}

/// Check that `len` pixels make a `width`×`height` image.
///
/// * `len`    - Number of pixels.
/// * `width`  - Image width.
/// * `height` - Image height.
fn check_size(len: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidImageSize { width, height });
    }
    if len != width * height {
        return Err(Error::ImageSizeMismatch {
            expected: width * height,
            actual: len,
        });
    }
    Ok(())
}

/// Writes row-major RGB pixels as an 8-bit PNG.
///
/// * `path`   - Output file path.
/// * `pixels` - Pixel colors, top row first.
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn write_rgb_png<P: AsRef<Path>>(
    path: P,
    pixels: &[Spectrum],
    width: usize,
    height: usize,
) -> Result<()> {
    check_size(pixels.len(), width, height)?;
    info!(
        "Writing image {} with resolution {}x{}",
        path.as_ref().display(),
        width,
        height
    );

    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let c = pixels[y as usize * width + x as usize];
        Rgb([to8b(c[0]), to8b(c[1]), to8b(c[2])])
    });
    imgbuf.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Writes a row-major scalar map (depth, disparity, opacity) as an 8-bit
/// grayscale PNG after dividing by its largest finite value.
///
/// * `path`   - Output file path.
/// * `values` - Scalar values, top row first.
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn write_scalar_png<P: AsRef<Path>>(
    path: P,
    values: &[Float],
    width: usize,
    height: usize,
) -> Result<()> {
    check_size(values.len(), width, height)?;
    info!(
        "Writing image {} with resolution {}x{}",
        path.as_ref().display(),
        width,
        height
    );

    let peak = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0, |acc: Float, v| max(acc, *v));
    let scale = if peak > 0.0 { 1.0 / peak } else { 0.0 };

    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Luma([to8b(values[y as usize * width + x as usize] * scale)])
    });
    imgbuf.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
