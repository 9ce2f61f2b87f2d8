//! Render Calls

use cameras::*;
use integrators::*;
use nerf_core::common::*;
use nerf_core::context::*;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::geometry::*;

/// Near plane used by the NDC remap.
pub const NDC_NEAR: Float = 1.0;

/// The radiance fields queried by a render.
#[derive(Copy, Clone)]
pub struct Fields<'a> {
    /// Field for the coarse pass.
    pub coarse: &'a dyn RadianceField,

    /// Field for the fine pass; the coarse field is reused when absent.
    pub fine: Option<&'a dyn RadianceField>,
}

impl<'a> Fields<'a> {
    /// Use one field for both passes.
    ///
    /// * `field` - The field.
    pub fn single(field: &'a dyn RadianceField) -> Self {
        Self {
            coarse: field,
            fine: None,
        }
    }
}

/// Options of a render call beyond the sampling settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Sampling and compositing settings.
    pub settings: RenderSettings,

    /// Remap rays into normalized device coordinates.
    pub ndc: bool,

    /// Pose whose rays are rendered while view directions keep coming from
    /// the requested pose.
    pub static_camera: Option<Transform>,
}

impl RenderOptions {
    /// Create render options without NDC or a static camera.
    ///
    /// * `settings` - Sampling and compositing settings.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ndc: false,
            static_camera: None,
        }
    }
}

/// Rays to render.
#[derive(Copy, Clone, Debug)]
pub enum RayInput<'a> {
    /// Every pixel of the image seen from a camera pose.
    Pose {
        camera_to_world: &'a Transform,
        bounds: &'a Bounds,
    },

    /// Prebuilt rays carrying their own bounds.
    Batch(&'a RayBatch),
}

/// Renders rays and returns one output per ray. For a pose the outputs are
/// the image pixels in row-major order.
///
/// * `width`      - Image width.
/// * `height`     - Image height.
/// * `intrinsics` - Camera intrinsics.
/// * `input`      - Rays to render.
/// * `fields`     - Radiance fields.
/// * `options`    - Render options.
/// * `ctx`        - Render context.
pub fn render(
    width: usize,
    height: usize,
    intrinsics: &Intrinsics,
    input: RayInput,
    fields: Fields,
    options: &RenderOptions,
    ctx: &RenderContext,
) -> Result<RenderResult> {
    let use_viewdirs = options.settings.use_viewdirs;

    let (origins, directions, bounds, view_dirs) = match input {
        RayInput::Pose {
            camera_to_world,
            bounds,
        } => {
            let camera = PinholeCamera::new(width, height, *intrinsics)?;
            let (o, d) = camera.generate_rays(camera_to_world);
            let view_dirs = use_viewdirs.then(|| normalized(&d));

            match options.static_camera {
                Some(static_pose) if use_viewdirs => {
                    let (so, sd) = camera.generate_rays(&static_pose);
                    (so, sd, bounds.clone(), view_dirs)
                }
                _ => (o, d, bounds.clone(), view_dirs),
            }
        }
        RayInput::Batch(batch) => {
            let o = batch.rays.iter().map(|r| r.o).collect();
            let d = batch.rays.iter().map(|r| r.d).collect();
            let b = Bounds::PerRay(batch.rays.iter().map(|r| (r.near, r.far)).collect());
            let view_dirs = use_viewdirs.then(|| {
                batch
                    .rays
                    .iter()
                    .map(|r| r.view_dir.unwrap_or_else(|| r.d.normalize()))
                    .collect()
            });
            (o, d, b, view_dirs)
        }
    };

    let (origins, directions) = if options.ndc {
        ndc_rays(width, height, intrinsics.fx, NDC_NEAR, &origins, &directions)?
    } else {
        (origins, directions)
    };

    let batch = RayBatch::from_parts(&origins, &directions, &bounds, view_dirs.as_deref())?;
    let renderer = VolumeRenderer::new(fields.coarse, fields.fine, options.settings)?;
    renderer.render(&batch, ctx)
}

/// Returns unit-length copies of `directions`.
fn normalized(directions: &[Vector3f]) -> Vec<Vector3f> {
    directions.iter().map(|d| d.normalize()).collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
