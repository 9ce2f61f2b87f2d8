//! Volume Renderer

use super::{ChunkedBatcher, Composite, FineExtras, RenderResult, VolumeIntegrator};
use itertools::izip;
use nerf_core::common::*;
use nerf_core::context::*;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use nerf_core::rng::*;
use samplers::*;
use std::ops::Range;

/// Options controlling how rays are sampled and composited.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Number of coarse samples per ray.
    pub n_samples: usize,

    /// Number of additional fine samples per ray; 0 skips the fine pass.
    pub n_importance: usize,

    /// Stratify coarse samples and draw importance samples at random.
    pub perturb: bool,

    /// Space coarse samples linearly in inverse depth.
    pub lindisp: bool,

    /// Pass unit view directions to the radiance field.
    pub use_viewdirs: bool,

    /// Composite over a white backdrop.
    pub white_bkgd: bool,

    /// Standard deviation of noise added to density logits.
    pub raw_noise_std: Float,

    /// Return the raw samples of the final pass.
    pub ret_raw: bool,

    /// Maximum number of rays rendered together.
    pub chunk: usize,

    /// Maximum number of points per field query.
    pub netchunk: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            n_samples: 64,
            n_importance: 0,
            perturb: true,
            lindisp: false,
            use_viewdirs: false,
            white_bkgd: false,
            raw_noise_std: 0.0,
            ret_raw: false,
            chunk: 1024 * 32,
            netchunk: 1024 * 64,
        }
    }
}

impl RenderSettings {
    /// Returns the settings used for evaluation renders: no stratification and
    /// no density noise.
    pub fn for_evaluation(&self) -> Self {
        Self {
            perturb: false,
            raw_noise_std: 0.0,
            ..*self
        }
    }

    /// Verify sample counts.
    pub fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(Error::InvalidSampleCount(String::from(
                "coarse sample count must be positive",
            )));
        }
        if self.n_importance > 0 && self.n_samples < 3 {
            return Err(Error::InvalidSampleCount(format!(
                "fine sampling needs at least 3 coarse samples, got {}",
                self.n_samples
            )));
        }
        Ok(())
    }
}

/// Samples of one pass for every ray of a chunk.
struct Pass {
    /// Sample depths per ray.
    z_vals: Vec<Vec<Float>>,

    /// Raw samples per ray.
    raw: Vec<Vec<RawSample>>,

    /// Composited outputs per ray.
    composites: Vec<Composite>,
}

/// Renders ray batches against a coarse radiance field and, when fine
/// sampling is enabled, a second pass against the fine field.
pub struct VolumeRenderer<'a> {
    /// Field for the coarse pass.
    coarse: &'a dyn RadianceField,

    /// Field for the fine pass; the coarse field when absent.
    fine: Option<&'a dyn RadianceField>,

    /// Rendering options.
    settings: RenderSettings,

    /// Coarse depth sampler.
    depth_sampler: DepthSampler,

    /// Fine depth sampler.
    importance_sampler: ImportanceSampler,

    /// Compositor.
    integrator: VolumeIntegrator,

    /// Chunking.
    batcher: ChunkedBatcher,
}

impl<'a> VolumeRenderer<'a> {
    /// Create a new `VolumeRenderer`.
    ///
    /// * `coarse`   - Field for the coarse pass.
    /// * `fine`     - Optional field for the fine pass.
    /// * `settings` - Rendering options.
    pub fn new(
        coarse: &'a dyn RadianceField,
        fine: Option<&'a dyn RadianceField>,
        settings: RenderSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let spacing = if settings.lindisp {
            Spacing::InverseDepth
        } else {
            Spacing::Linear
        };

        Ok(Self {
            coarse,
            fine,
            settings,
            depth_sampler: DepthSampler::new(settings.n_samples, spacing, settings.perturb)?,
            importance_sampler: ImportanceSampler::new(settings.n_importance, !settings.perturb),
            integrator: VolumeIntegrator::new(settings.white_bkgd, settings.raw_noise_std),
            batcher: ChunkedBatcher::new(settings.chunk, settings.netchunk)?,
        })
    }

    /// Returns the rendering options.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Renders every ray of `batch`. Output `i` belongs to ray `i`; random
    /// draws for ray `i` come from `ctx.ray_rng(i)`.
    ///
    /// * `batch` - The rays.
    /// * `ctx`   - Render context.
    pub fn render(&self, batch: &RayBatch, ctx: &RenderContext) -> Result<RenderResult> {
        batch.validate(self.settings.lindisp)?;
        debug!(
            "Rendering {} rays with {} + {} samples per ray",
            batch.len(),
            self.settings.n_samples,
            self.settings.n_importance
        );

        let mut result = self
            .batcher
            .render(batch.len(), |range| self.render_chunk(&batch.rays[range.clone()], range, ctx))?;
        result.check_numerics();
        Ok(result)
    }

    /// Renders one chunk of rays.
    ///
    /// * `rays`  - The rays of the chunk.
    /// * `range` - Global indices of the rays.
    /// * `ctx`   - Render context.
    fn render_chunk(&self, rays: &[Ray], range: Range<usize>, ctx: &RenderContext) -> Result<RenderResult> {
        let mut rngs: Vec<RNG> = range.map(|i| ctx.ray_rng(i)).collect();

        // Coarse pass.
        let z_coarse: Vec<Vec<Float>> = rays
            .iter()
            .zip(rngs.iter_mut())
            .map(|(ray, rng)| self.depth_sampler.sample(ray.near, ray.far, rng))
            .collect();
        let coarse = self.run_pass(self.coarse, rays, z_coarse, &mut rngs)?;

        if self.settings.n_importance == 0 {
            return Ok(self.assemble(coarse, None));
        }

        // Fine pass.
        let mut z_fine = Vec::with_capacity(rays.len());
        let mut z_std = Vec::with_capacity(rays.len());
        for (z, c, rng) in izip!(coarse.z_vals.iter(), coarse.composites.iter(), rngs.iter_mut()) {
            let samples = self.importance_sampler.sample(z, &c.weights, rng)?;
            z_std.push(spread(&samples));
            z_fine.push(merge_depths(z, &samples));
        }
        let field = self.fine.unwrap_or(self.coarse);
        let fine = self.run_pass(field, rays, z_fine, &mut rngs)?;

        Ok(self.assemble(fine, Some((coarse, z_std))))
    }

    /// Queries `field` at the given depths of every ray and composites the
    /// results.
    ///
    /// * `field`  - The radiance field.
    /// * `rays`   - The rays.
    /// * `z_vals` - Sample depths per ray.
    /// * `rngs`   - Per-ray random number generators.
    fn run_pass(
        &self,
        field: &dyn RadianceField,
        rays: &[Ray],
        z_vals: Vec<Vec<Float>>,
        rngs: &mut [RNG],
    ) -> Result<Pass> {
        let n_points: usize = z_vals.iter().map(|z| z.len()).sum();
        let mut positions = Vec::with_capacity(n_points);
        let mut view_dirs = Vec::with_capacity(if self.settings.use_viewdirs { n_points } else { 0 });

        for (ray, z) in rays.iter().zip(z_vals.iter()) {
            positions.extend(z.iter().map(|t| ray.at(*t)));
            if self.settings.use_viewdirs {
                let w = ray.view_dir.unwrap_or_else(|| ray.d.normalize());
                view_dirs.extend(std::iter::repeat(w).take(z.len()));
            }
        }

        let dirs = self.settings.use_viewdirs.then(|| view_dirs.as_slice());
        let flat = self.batcher.query(field, &positions, dirs)?;

        let mut raw = Vec::with_capacity(rays.len());
        let mut composites = Vec::with_capacity(rays.len());
        let mut start = 0;
        for (ray, z, rng) in izip!(rays.iter(), z_vals.iter(), rngs.iter_mut()) {
            let samples = flat[start..start + z.len()].to_vec();
            start += z.len();

            composites.push(self.integrator.integrate(&samples, z, &ray.d, rng));
            raw.push(samples);
        }

        Ok(Pass {
            z_vals,
            raw,
            composites,
        })
    }

    /// Builds the result of a chunk from its final pass and, after fine
    /// sampling, the coarse pass and fine sample spread.
    ///
    /// * `last`   - The final pass.
    /// * `coarse` - Coarse pass and per-ray spread of the fine samples.
    fn assemble(&self, last: Pass, coarse: Option<(Pass, Vec<Float>)>) -> RenderResult {
        let n = last.composites.len();
        let mut result = RenderResult {
            rgb: Vec::with_capacity(n),
            disparity: Vec::with_capacity(n),
            acc: Vec::with_capacity(n),
            depth: Vec::with_capacity(n),
            weights: Vec::with_capacity(n),
            raw: self.settings.ret_raw.then(|| last.raw),
            fine: None,
            diagnostics: vec![],
        };
        for c in last.composites {
            result.rgb.push(c.rgb);
            result.disparity.push(c.disparity);
            result.acc.push(c.acc);
            result.depth.push(c.depth);
            result.weights.push(c.weights);
        }

        result.fine = coarse.map(|(pass, z_std)| FineExtras {
            rgb0: pass.composites.iter().map(|c| c.rgb).collect(),
            disparity0: pass.composites.iter().map(|c| c.disparity).collect(),
            acc0: pass.composites.iter().map(|c| c.acc).collect(),
            z_std,
        });

        result
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    /// A thin slab of density around `z = -depth`, colored by logits.
    struct Slab {
        depth: Float,
        rgb: [Float; 3],
    }

    impl RadianceField for Slab {
        fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
            positions
                .iter()
                .map(|p| {
                    let inside = (p.z + self.depth).abs() < 0.05;
                    RawSample::new(self.rgb, if inside { 1e4 } else { -1.0 })
                })
                .collect()
        }
    }

    /// Density that varies smoothly with position.
    struct Smooth;

    impl RadianceField for Smooth {
        fn query(&self, positions: &[Point3f], view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
            positions
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let tint = view_dirs.map_or(0.0, |d| d[i].x);
                    RawSample::new([p.x + tint, p.y, -p.z], (0.5 + 0.5 * (3.0 * p.z).sin()) * 2.0)
                })
                .collect()
        }
    }

    /// Always returns zero density.
    struct Empty;

    impl RadianceField for Empty {
        fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
            vec![RawSample::new([0.0; 3], 0.0); positions.len()]
        }
    }

    fn rays(n: usize) -> RayBatch {
        let rays = (0..n)
            .map(|i| {
                let x = -0.5 + i as Float / n as Float;
                Ray::new(Point3f::zero(), Vector3f::new(x, 0.25 * x, -1.0), 2.0, 6.0)
            })
            .collect();
        RayBatch::new(rays)
    }

    fn settings() -> RenderSettings {
        RenderSettings {
            n_samples: 32,
            n_importance: 16,
            raw_noise_std: 0.5,
            use_viewdirs: true,
            ret_raw: true,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_and_evaluation_variant() {
        let s = RenderSettings {
            raw_noise_std: 1.0,
            ..Default::default()
        };
        assert_eq!(s.n_samples, 64);
        assert!(s.perturb);
        let e = s.for_evaluation();
        assert!(!e.perturb);
        assert_eq!(e.raw_noise_std, 0.0);
        assert_eq!(e.chunk, s.chunk);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let s = RenderSettings {
            n_samples: 0,
            ..Default::default()
        };
        assert!(VolumeRenderer::new(&Empty, None, s).is_err());

        let s = RenderSettings {
            n_samples: 2,
            n_importance: 4,
            ..Default::default()
        };
        assert!(VolumeRenderer::new(&Empty, None, s).is_err());

        let s = RenderSettings {
            chunk: 0,
            ..Default::default()
        };
        assert!(matches!(
            VolumeRenderer::new(&Empty, None, s),
            Err(Error::InvalidChunkSize(_))
        ));
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        let renderer = VolumeRenderer::new(&Empty, None, RenderSettings::default()).unwrap();
        let batch = RayBatch::new(vec![Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0), 4.0, 2.0)]);
        let r = renderer.render(&batch, &RenderContext::deterministic());
        assert!(matches!(r, Err(Error::InvalidBounds { index: 0, .. })));
    }

    #[test]
    fn empty_field_on_white_is_white() {
        let s = RenderSettings {
            white_bkgd: true,
            n_importance: 8,
            ..Default::default()
        };
        let renderer = VolumeRenderer::new(&Empty, None, s).unwrap();
        let result = renderer.render(&rays(5), &RenderContext::deterministic()).unwrap();
        assert_eq!(result.len(), 5);
        for i in 0..5 {
            assert!(approx_eq!(f32, result.acc[i], 0.0, epsilon = 1e-6));
            for c in 0..3 {
                assert!(approx_eq!(f32, result.rgb[i][c], 1.0, epsilon = 1e-6));
            }
        }
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn opaque_red_slab_gives_red_at_its_depth() {
        let s = RenderSettings {
            n_samples: 128,
            n_importance: 64,
            perturb: false,
            ..Default::default()
        };
        let field = Slab {
            depth: 4.0,
            rgb: [20.0, -20.0, -20.0],
        };
        let renderer = VolumeRenderer::new(&field, None, s).unwrap();
        let batch = RayBatch::new(vec![Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, -1.0), 2.0, 6.0)]);
        let result = renderer.render(&batch, &RenderContext::deterministic()).unwrap();

        assert!(approx_eq!(f32, result.rgb[0][0], 1.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, result.rgb[0][1], 0.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, result.rgb[0][2], 0.0, epsilon = 1e-3));
        assert!(approx_eq!(f32, result.depth[0], 4.0, epsilon = 0.05));
        assert!(approx_eq!(f32, result.acc[0], 1.0, epsilon = 1e-3));

        let fine = result.fine.unwrap();
        assert!(approx_eq!(f32, fine.rgb0[0][0], 1.0, epsilon = 1e-3));
        assert!(fine.z_std[0] < 0.1);
    }

    #[test]
    fn chunk_size_does_not_change_results() {
        let batch = rays(7);
        let ctx = RenderContext::deterministic();

        let one = VolumeRenderer::new(
            &Smooth,
            None,
            RenderSettings {
                chunk: 1,
                netchunk: 5,
                ..settings()
            },
        )
        .unwrap()
        .render(&batch, &ctx)
        .unwrap();

        let all = VolumeRenderer::new(
            &Smooth,
            None,
            RenderSettings {
                chunk: 7,
                netchunk: 1 << 16,
                ..settings()
            },
        )
        .unwrap()
        .render(&batch, &ctx)
        .unwrap();

        assert_eq!(one, all);
        assert_eq!(one.len(), 7);
        assert_eq!(one.weights[0].len(), 48);
        assert_eq!(one.raw.as_ref().unwrap()[0].len(), 48);
    }

    #[test]
    fn same_context_same_output_different_seed_different_output() {
        let batch = rays(4);
        let renderer = VolumeRenderer::new(&Smooth, None, settings()).unwrap();
        let a = renderer.render(&batch, &RenderContext::new(11)).unwrap();
        let b = renderer.render(&batch, &RenderContext::new(11)).unwrap();
        let c = renderer.render(&batch, &RenderContext::new(12)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.depth, c.depth);
    }

    #[test]
    fn fine_field_is_used_for_the_fine_pass() {
        let s = RenderSettings {
            n_samples: 16,
            n_importance: 16,
            perturb: false,
            ..Default::default()
        };
        let renderer = VolumeRenderer::new(&Smooth, Some(&Empty), s).unwrap();
        let result = renderer.render(&rays(3), &RenderContext::deterministic()).unwrap();
        let fine = result.fine.unwrap();
        for i in 0..3 {
            assert_eq!(result.acc[i], 0.0);
            assert!(fine.acc0[i] > 0.0);
        }
    }

    #[test]
    fn coarse_only_has_no_extras() {
        let s = RenderSettings {
            n_samples: 8,
            ..Default::default()
        };
        let renderer = VolumeRenderer::new(&Smooth, None, s).unwrap();
        let result = renderer.render(&rays(2), &RenderContext::deterministic()).unwrap();
        assert!(result.fine.is_none());
        assert!(result.raw.is_none());
        assert_eq!(result.weights[1].len(), 8);
    }

    #[test]
    fn non_finite_field_output_is_a_diagnostic_not_an_error() {
        struct Broken;
        impl RadianceField for Broken {
            fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
                vec![RawSample::new([Float::NAN; 3], 1.0); positions.len()]
            }
        }

        let s = RenderSettings {
            n_samples: 4,
            ..Default::default()
        };
        let renderer = VolumeRenderer::new(&Broken, None, s).unwrap();
        let result = renderer.render(&rays(3), &RenderContext::deterministic()).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.diagnostics.iter().any(|d| d.ray == 2 && d.field == "rgb"));
        assert!(result.rgb.iter().all(|c| c.has_nans()));
    }

    /// Returns the same density logit everywhere.
    struct ConstantDensity(Float);

    impl RadianceField for ConstantDensity {
        fn query(&self, positions: &[Point3f], _view_dirs: Option<&[Vector3f]>) -> Vec<RawSample> {
            vec![RawSample::new([0.0; 3], self.0); positions.len()]
        }
    }

    #[test]
    fn nan_density_is_reported() {
        let s = RenderSettings {
            n_samples: 16,
            perturb: false,
            ..Default::default()
        };
        let field = ConstantDensity(Float::NAN);
        let renderer = VolumeRenderer::new(&field, None, s).unwrap();
        let result = renderer.render(&rays(2), &RenderContext::deterministic()).unwrap();
        assert!(result.acc.iter().all(|a| a.is_nan()));
        for ray in 0..2 {
            assert!(result.diagnostics.iter().any(|d| d.ray == ray && d.field == "acc"));
            assert!(result.diagnostics.iter().any(|d| d.ray == ray && d.field == "rgb"));
        }
    }

    #[test]
    fn infinite_density_on_collapsed_depths_survives_the_fine_pass() {
        // At this distance neighbouring depths round to the same value, so
        // an infinite density meets a zero interval.
        let near = 1e6;
        let batch = RayBatch::new(vec![Ray::new(
            Point3f::zero(),
            Vector3f::new(0.0, 0.0, -1.0),
            near,
            near + 1.0,
        )]);
        let s = RenderSettings {
            n_samples: 64,
            n_importance: 8,
            perturb: false,
            ..Default::default()
        };
        let field = ConstantDensity(Float::INFINITY);
        let renderer = VolumeRenderer::new(&field, None, s).unwrap();
        let result = renderer.render(&batch, &RenderContext::deterministic()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.weights[0].len(), 72);
        assert!(!result.diagnostics.is_empty());
        let fine = result.fine.as_ref().unwrap();
        assert!(fine.z_std[0].is_finite());
    }
}
