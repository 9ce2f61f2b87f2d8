//! Render Results

use nerf_core::common::*;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::spectrum::*;

/// Output of the coarse pass kept alongside the fine result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FineExtras {
    /// Coarse composited color.
    pub rgb0: Vec<Spectrum>,

    /// Coarse disparity.
    pub disparity0: Vec<Float>,

    /// Coarse accumulated opacity.
    pub acc0: Vec<Float>,

    /// Standard deviation of each ray's importance samples.
    pub z_std: Vec<Float>,
}

impl FineExtras {
    fn append(&mut self, mut other: FineExtras) {
        self.rgb0.append(&mut other.rgb0);
        self.disparity0.append(&mut other.disparity0);
        self.acc0.append(&mut other.acc0);
        self.z_std.append(&mut other.z_std);
    }
}

/// A non-finite value found in a render output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index of the ray within the render.
    pub ray: usize,

    /// Name of the output holding the value.
    pub field: &'static str,
}

/// Per-ray outputs of a render, in input ray order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderResult {
    /// Composited color.
    pub rgb: Vec<Spectrum>,

    /// Disparity (inverse depth).
    pub disparity: Vec<Float>,

    /// Accumulated opacity.
    pub acc: Vec<Float>,

    /// Expected depth.
    pub depth: Vec<Float>,

    /// Compositing weights, one sequence per ray in ascending depth order.
    pub weights: Vec<Vec<Float>>,

    /// Raw field outputs of the final pass when requested.
    pub raw: Option<Vec<Vec<RawSample>>>,

    /// Coarse echo and sample spread when fine sampling ran.
    pub fine: Option<FineExtras>,

    /// Non-finite outputs.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderResult {
    /// Returns the number of rays.
    pub fn len(&self) -> usize {
        self.rgb.len()
    }

    /// Returns true if there are no rays.
    pub fn is_empty(&self) -> bool {
        self.rgb.is_empty()
    }

    /// Appends the results of the rays that follow this result's rays.
    /// Diagnostic ray indices of `other` are rebased onto this result.
    ///
    /// Both results must carry the same optional outputs.
    ///
    /// * `other` - Result for the following rays.
    pub fn append(&mut self, mut other: RenderResult) -> Result<()> {
        if self.raw.is_some() != other.raw.is_some() {
            return Err(Error::InconsistentChunks(String::from(
                "raw samples present in some chunks only",
            )));
        }
        if self.fine.is_some() != other.fine.is_some() {
            return Err(Error::InconsistentChunks(String::from(
                "fine pass outputs present in some chunks only",
            )));
        }

        let base = self.len();
        self.diagnostics
            .extend(other.diagnostics.drain(..).map(|d| Diagnostic {
                ray: d.ray + base,
                ..d
            }));

        self.rgb.append(&mut other.rgb);
        self.disparity.append(&mut other.disparity);
        self.acc.append(&mut other.acc);
        self.depth.append(&mut other.depth);
        self.weights.append(&mut other.weights);

        if let (Some(raw), Some(mut other_raw)) = (self.raw.as_mut(), other.raw) {
            raw.append(&mut other_raw);
        }
        if let (Some(fine), Some(other_fine)) = (self.fine.as_mut(), other.fine) {
            fine.append(other_fine);
        }

        Ok(())
    }

    /// Concatenates per-chunk results in order.
    ///
    /// * `chunks` - Results of consecutive ray chunks.
    pub fn merge<I>(chunks: I) -> Result<Self>
    where
        I: IntoIterator<Item = RenderResult>,
    {
        let mut iter = chunks.into_iter();
        let mut merged = match iter.next() {
            Some(first) => first,
            None => return Ok(Self::default()),
        };
        for chunk in iter {
            merged.append(chunk)?;
        }
        Ok(merged)
    }

    /// Scans the per-ray outputs for non-finite values, logs each one and
    /// records it in `diagnostics`.
    pub fn check_numerics(&mut self) {
        let mut found = vec![];

        for i in 0..self.len() {
            if !self.rgb[i].is_finite() {
                found.push(Diagnostic { ray: i, field: "rgb" });
            }
            if !self.disparity[i].is_finite() {
                found.push(Diagnostic { ray: i, field: "disparity" });
            }
            if !self.acc[i].is_finite() {
                found.push(Diagnostic { ray: i, field: "acc" });
            }
            if !self.depth[i].is_finite() {
                found.push(Diagnostic { ray: i, field: "depth" });
            }
            if self.weights[i].iter().any(|w| !w.is_finite()) {
                found.push(Diagnostic { ray: i, field: "weights" });
            }
            if let Some(raw) = self.raw.as_ref() {
                if raw[i].iter().any(|r| !r.is_finite()) {
                    found.push(Diagnostic { ray: i, field: "raw" });
                }
            }
            if let Some(fine) = self.fine.as_ref() {
                if !fine.rgb0[i].is_finite() {
                    found.push(Diagnostic { ray: i, field: "rgb0" });
                }
                if !fine.disparity0[i].is_finite() {
                    found.push(Diagnostic { ray: i, field: "disparity0" });
                }
                if !fine.acc0[i].is_finite() {
                    found.push(Diagnostic { ray: i, field: "acc0" });
                }
                if !fine.z_std[i].is_finite() {
                    found.push(Diagnostic { ray: i, field: "z_std" });
                }
            }
        }

        for d in found.iter() {
            warn!("Non-finite {} for ray {}", d.field, d.ray);
        }
        self.diagnostics.extend(found);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
