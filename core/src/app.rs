//! Application related stuff

use crate::common::Float;
use crate::context::RenderContext;
use clap::{Parser, ValueEnum};

/// Reference scenes the command line renderer can draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// A solid colored sphere at the origin.
    Sphere,

    /// A homogeneous fog filling all of space.
    Homogeneous,

    /// A voxel grid sampled from a soft sphere.
    Grid,
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Image width in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 200, help = "Image width in pixels.")]
    pub width: usize,

    /// Image height in pixels.
    #[arg(long, value_name = "NUM", default_value_t = 200, help = "Image height in pixels.")]
    pub height: usize,

    /// Focal length in pixels.
    #[arg(long, value_name = "FLOAT", default_value_t = 250.0, help = "Focal length in pixels.")]
    pub focal: Float,

    /// Nearest sampled depth.
    #[arg(long, value_name = "FLOAT", default_value_t = 2.0, help = "Nearest sampled depth.")]
    pub near: Float,

    /// Farthest sampled depth.
    #[arg(long, value_name = "FLOAT", default_value_t = 6.0, help = "Farthest sampled depth.")]
    pub far: Float,

    /// Number of coarse samples per ray.
    #[arg(
        long = "samples",
        short = 'N',
        value_name = "NUM",
        default_value_t = 64,
        help = "Number of coarse samples per ray."
    )]
    pub n_samples: usize,

    /// Number of additional fine samples per ray.
    #[arg(
        long = "importance",
        value_name = "NUM",
        default_value_t = 64,
        help = "Number of additional fine samples per ray (0 disables the fine pass)."
    )]
    pub n_importance: usize,

    /// Stratify coarse samples.
    #[arg(long, help = "Jitter coarse samples within their strata.")]
    pub perturb: bool,

    /// Sample linearly in inverse depth.
    #[arg(long, help = "Sample linearly in inverse depth rather than in depth.")]
    pub lindisp: bool,

    /// Feed view directions to the field.
    #[arg(long = "use-viewdirs", help = "Pass unit view directions to the radiance field.")]
    pub use_viewdirs: bool,

    /// Composite over a white background.
    #[arg(long = "white-bkgd", help = "Composite over a white background.")]
    pub white_bkgd: bool,

    /// Standard deviation of noise added to density logits.
    #[arg(
        long = "raw-noise-std",
        value_name = "FLOAT",
        default_value_t = 0.0,
        help = "Standard deviation of noise added to density logits."
    )]
    pub raw_noise_std: Float,

    /// Remap rays into normalized device coordinates.
    #[arg(long, help = "Remap rays into normalized device coordinates (forward facing scenes).")]
    pub ndc: bool,

    /// Ray chunk size.
    #[arg(
        long,
        value_name = "NUM",
        default_value_t = 1024 * 32,
        help = "Maximum number of rays processed together."
    )]
    pub chunk: usize,

    /// Point chunk size.
    #[arg(
        long,
        value_name = "NUM",
        default_value_t = 1024 * 64,
        help = "Maximum number of points sent to the field at once."
    )]
    pub netchunk: usize,

    /// Number of frames on the orbit.
    #[arg(long, value_name = "NUM", default_value_t = 8, help = "Number of frames on the orbit.")]
    pub frames: usize,

    /// Orbit radius.
    #[arg(long, value_name = "FLOAT", default_value_t = 4.0, help = "Camera distance from the origin.")]
    pub radius: Float,

    /// Downsampling factor.
    #[arg(
        long = "render-factor",
        value_name = "NUM",
        default_value_t = 0,
        help = "Downsample the image by this factor for speed (0 disables)."
    )]
    pub render_factor: usize,

    /// Scene to render.
    #[arg(long, value_enum, default_value_t = SceneKind::Sphere, help = "Scene to render.")]
    pub scene: SceneKind,

    /// Seed for the random streams.
    #[arg(long, value_name = "NUM", help = "Seed for the random streams.")]
    pub seed: Option<u64>,

    /// Use the fixed test seed.
    #[arg(long, help = "Use the fixed test seed so output is reproducible.")]
    pub deterministic: bool,

    /// Output directory.
    #[arg(
        long = "outdir",
        short = 'o',
        value_name = "DIR",
        default_value = "renders",
        help = "Write the rendered frames to the given directory."
    )]
    pub out_dir: String,

    /// Also write depth maps.
    #[arg(long = "save-depths", help = "Also write normalized depth maps.")]
    pub save_depths: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,
}

impl Options {
    /// Returns the render context selected by `--deterministic` and `--seed`.
    pub fn context(&self) -> RenderContext {
        if self.deterministic {
            RenderContext::deterministic()
        } else if let Some(seed) = self.seed {
            RenderContext::new(seed)
        } else {
            RenderContext::from_entropy()
        }
    }

    /// Returns the log level filter implied by `--quiet`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Info
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
