//! Chunked Batching

use super::RenderResult;
use nerf_core::error::*;
use nerf_core::field::*;
use nerf_core::geometry::*;
use std::ops::Range;

/// Splits rays and sample points into bounded-size chunks and reassembles
/// the outputs in input order. Chunk sizes bound memory use only; they never
/// change any output value.
#[derive(Copy, Clone, Debug)]
pub struct ChunkedBatcher {
    /// Maximum number of rays rendered together.
    chunk: usize,

    /// Maximum number of points sent to the radiance field at once.
    netchunk: usize,
}

impl ChunkedBatcher {
    /// Create a new `ChunkedBatcher`.
    ///
    /// * `chunk`    - Maximum number of rays rendered together.
    /// * `netchunk` - Maximum number of points per field query.
    pub fn new(chunk: usize, netchunk: usize) -> Result<Self> {
        if chunk == 0 {
            return Err(Error::InvalidChunkSize(String::from("ray chunk must be positive")));
        }
        if netchunk == 0 {
            return Err(Error::InvalidChunkSize(String::from("point chunk must be positive")));
        }
        Ok(Self { chunk, netchunk })
    }

    /// Returns consecutive index ranges of at most `chunk` rays covering
    /// `0..n_rays`.
    ///
    /// * `n_rays` - Number of rays.
    pub fn ray_chunks(&self, n_rays: usize) -> impl Iterator<Item = Range<usize>> {
        let chunk = self.chunk;
        (0..n_rays)
            .step_by(chunk)
            .map(move |start| start..(start + chunk).min(n_rays))
    }

    /// Renders `n_rays` rays one chunk at a time with `render_chunk` and
    /// concatenates the chunk results. `render_chunk` receives the global
    /// index range of its rays.
    ///
    /// * `n_rays`       - Number of rays.
    /// * `render_chunk` - Renders one range of rays.
    pub fn render<F>(&self, n_rays: usize, mut render_chunk: F) -> Result<RenderResult>
    where
        F: FnMut(Range<usize>) -> Result<RenderResult>,
    {
        let mut merged: Option<RenderResult> = None;
        for range in self.ray_chunks(n_rays) {
            debug!("Rendering rays {}..{}", range.start, range.end);
            let expected = range.len();

            let result = render_chunk(range)?;
            if result.len() != expected {
                return Err(Error::InconsistentChunks(format!(
                    "chunk of {} rays produced {} results",
                    expected,
                    result.len()
                )));
            }

            match merged.as_mut() {
                Some(m) => m.append(result)?,
                None => merged = Some(result),
            }
        }
        Ok(merged.unwrap_or_default())
    }

    /// Queries `field` at every position, at most `netchunk` points at a
    /// time, and returns the raw samples in input order.
    ///
    /// * `field`     - The radiance field.
    /// * `positions` - Sample positions.
    /// * `view_dirs` - Optional unit view directions, one per position.
    pub fn query(
        &self,
        field: &dyn RadianceField,
        positions: &[Point3f],
        view_dirs: Option<&[Vector3f]>,
    ) -> Result<Vec<RawSample>> {
        let mut raw = Vec::with_capacity(positions.len());
        for start in (0..positions.len()).step_by(self.netchunk) {
            let end = (start + self.netchunk).min(positions.len());
            let dirs = view_dirs.map(|d| &d[start..end]);

            let out = field.query(&positions[start..end], dirs);
            if out.len() != end - start {
                return Err(Error::FieldOutputMismatch {
                    requested: end - start,
                    returned: out.len(),
                });
            }
            raw.extend(out);
        }
        trace!("Queried {} points", positions.len());
        Ok(raw)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
