#[macro_use]
extern crate log;

use api::*;
use cameras::*;
use clap::Parser;
use integrators::*;
use media::*;
use nerf_core::app::*;
use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use nerf_core::image_io::*;
use nerf_core::spectrum::*;
use std::path::Path;

/// Elevation of the orbit in degrees.
const ORBIT_ELEVATION: Float = 20.0;

fn main() {
    let options = Options::parse();

    // Initialize `env_logger`.
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if options.quiet {
        builder.filter_level(options.log_level());
    }
    builder.init();

    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<()> {
    let field = build_field(options.scene)?;
    let ctx = options.context();

    let settings = RenderSettings {
        n_samples: options.n_samples,
        n_importance: options.n_importance,
        perturb: options.perturb,
        lindisp: options.lindisp,
        use_viewdirs: options.use_viewdirs,
        white_bkgd: options.white_bkgd,
        raw_noise_std: options.raw_noise_std,
        ret_raw: false,
        chunk: options.chunk,
        netchunk: options.netchunk,
    };
    let render_options = RenderOptions {
        ndc: options.ndc,
        ..RenderOptions::new(settings)
    };

    let bounds = if options.ndc {
        Bounds::Uniform { near: 0.0, far: 1.0 }
    } else {
        Bounds::Uniform {
            near: options.near,
            far: options.far,
        }
    };

    let poses = orbit_poses(options.frames, options.radius, ORBIT_ELEVATION);
    let intrinsics = Intrinsics::from_focal(options.width, options.height, options.focal);

    let out = render_path(
        &poses,
        options.width,
        options.height,
        &intrinsics,
        &bounds,
        Fields::single(field.as_ref()),
        &render_options,
        options.render_factor,
        None,
        &ctx,
        options.quiet,
    )?;

    let out_dir = Path::new(&options.out_dir);
    std::fs::create_dir_all(out_dir)?;
    for (i, frame) in out.frames.iter().enumerate() {
        write_rgb_png(out_dir.join(format!("{i:03}.png")), &frame.rgb, out.width, out.height)?;
        if options.save_depths {
            write_scalar_png(
                out_dir.join(format!("{i:03}_depth.png")),
                &frame.depth,
                out.width,
                out.height,
            )?;
        }
    }

    info!("Wrote {} frames to {}", out.frames.len(), out_dir.display());
    Ok(())
}

/// Returns the reference field for the selected scene.
///
/// * `scene` - The scene.
fn build_field(scene: SceneKind) -> Result<Box<dyn RadianceField>> {
    let field: Box<dyn RadianceField> = match scene {
        SceneKind::Sphere => Box::new(SphereField::new(
            Point3f::zero(),
            1.0,
            Spectrum::from_rgb(0.8, 0.3, 0.2),
            30.0,
        )),
        SceneKind::Homogeneous => Box::new(HomogeneousField::from_color(Spectrum::new(0.7), 0.3)),
        SceneKind::Grid => {
            let extent = 1.5;
            Box::new(GridField::from_fn(
                32,
                Point3f::new(-extent, -extent, -extent),
                Point3f::new(extent, extent, extent),
                |p| {
                    let r = Vector3f::from(*p).length();
                    let color = Spectrum::from_rgb(0.5 + 0.4 * p.x / extent, 0.5, 0.5 - 0.4 * p.z / extent);
                    RawSample::new(color.map(logit).to_rgb(), 40.0 * max(0.0, 1.0 - r))
                },
            )?)
        }
    };
    Ok(field)
}
