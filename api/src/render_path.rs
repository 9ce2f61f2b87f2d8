//! Render Paths

use super::{render, Fields, RayInput, RenderOptions};
use cameras::*;
use indicatif::{ProgressBar, ProgressStyle};
use nerf_core::common::*;
use nerf_core::context::*;
use nerf_core::error::*;
use nerf_core::geometry::*;
use nerf_core::metrics::*;
use nerf_core::spectrum::*;

/// Images rendered for one pose.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Composited color.
    pub rgb: Vec<Spectrum>,

    /// Disparity.
    pub disparity: Vec<Float>,

    /// Expected depth.
    pub depth: Vec<Float>,

    /// Accumulated opacity.
    pub acc: Vec<Float>,
}

/// Output of `render_path`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathRender {
    /// Width of every frame.
    pub width: usize,

    /// Height of every frame.
    pub height: usize,

    /// One frame per pose.
    pub frames: Vec<Frame>,

    /// Mean squared error against the ground truth, averaged over frames.
    pub mse: Option<Float>,

    /// Peak signal-to-noise ratio of `mse`.
    pub psnr: Option<Float>,
}

/// Renders one frame per camera pose.
///
/// A non-zero `render_factor` divides the image size and intrinsics for a
/// faster preview. Ground truth images are only compared when rendering at
/// full resolution.
///
/// * `poses`         - Camera-to-world transforms.
/// * `width`         - Full resolution image width.
/// * `height`        - Full resolution image height.
/// * `intrinsics`    - Full resolution intrinsics.
/// * `bounds`        - Near/far bounds for every pixel.
/// * `fields`        - Radiance fields.
/// * `options`       - Render options.
/// * `render_factor` - Downsampling factor; 0 renders at full resolution.
/// * `gt_images`     - Optional ground truth image per pose.
/// * `ctx`           - Render context.
/// * `quiet`         - Hide the progress bar.
#[allow(clippy::too_many_arguments)]
pub fn render_path(
    poses: &[Transform],
    width: usize,
    height: usize,
    intrinsics: &Intrinsics,
    bounds: &Bounds,
    fields: Fields,
    options: &RenderOptions,
    render_factor: usize,
    gt_images: Option<&[Vec<Spectrum>]>,
    ctx: &RenderContext,
    quiet: bool,
) -> Result<PathRender> {
    let (width, height, intrinsics) = if render_factor != 0 {
        (
            width / render_factor,
            height / render_factor,
            intrinsics.downsample(render_factor),
        )
    } else {
        (width, height, *intrinsics)
    };
    if width == 0 || height == 0 {
        return Err(Error::InvalidImageSize { width, height });
    }
    let gt_images = if render_factor == 0 { gt_images } else { None };
    if let Some(gt) = gt_images {
        if gt.len() != poses.len() {
            return Err(Error::ImageSizeMismatch {
                expected: poses.len(),
                actual: gt.len(),
            });
        }
    }

    info!("Rendering {} frames at {}x{}", poses.len(), width, height);
    let progress = create_progress_reporter(poses.len() as u64, quiet);
    progress.set_message("Rendering path");

    let mut frames = Vec::with_capacity(poses.len());
    let mut mse_sum = 0.0;
    for (i, pose) in poses.iter().enumerate() {
        let input = RayInput::Pose {
            camera_to_world: pose,
            bounds,
        };
        let result = render(width, height, &intrinsics, input, fields, options, ctx)?;

        if let Some(gt) = gt_images {
            let mse = img2mse(&result.rgb, &gt[i])?;
            info!("Frame {}: PSNR {:.2}", i, mse2psnr(mse));
            mse_sum += mse;
        }

        frames.push(Frame {
            rgb: result.rgb,
            disparity: result.disparity,
            depth: result.depth,
            acc: result.acc,
        });
        progress.inc(1);
    }
    progress.finish_with_message("Render complete");

    let mse = gt_images
        .filter(|_| !poses.is_empty())
        .map(|_| mse_sum / poses.len() as Float);
    let psnr = mse.map(mse2psnr);
    if let Some(p) = psnr {
        info!("Mean PSNR {:.2}", p);
    }

    Ok(PathRender {
        width,
        height,
        frames,
        mse,
        psnr,
    })
}

/// Returns a progress bar for `len` steps, hidden when `quiet`.
///
/// * `len`   - Number of steps.
/// * `quiet` - Hide the progress bar.
fn create_progress_reporter(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    match ProgressStyle::with_template("{msg} {bar:40} {pos}/{len} ETA: {eta}") {
        Ok(style) => progress.set_style(style),
        Err(e) => warn!("Invalid progress template: {e}"),
    }
    progress
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
