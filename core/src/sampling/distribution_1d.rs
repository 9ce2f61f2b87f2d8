//! 1D Distribution.

use crate::common::*;

/// Represents a piecewise-constant 1D probability mass built from
/// non-negative weights and provides inverse-CDF sampling over it.
#[derive(Clone, Debug)]
pub struct Distribution1D {
    /// Normalized probability mass per interval.
    pub func: Vec<Float>,

    /// CDF over interval boundaries; `cdf[0] = 0` and `cdf.len() = func.len() + 1`.
    pub cdf: Vec<Float>,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for the given weights. Each weight is
    /// padded by `EPSILON` before normalization so an all-zero input yields a
    /// uniform distribution. Non-finite weights count as 0, and a total that
    /// overflows also yields a uniform distribution.
    ///
    /// - `f` - Non-negative weights, one per interval.
    pub fn new(f: &[Float]) -> Self {
        let n = f.len();
        let padded: Vec<Float> = f
            .iter()
            .map(|w| if w.is_finite() { w + EPSILON } else { EPSILON })
            .collect();
        let total: Float = padded.iter().sum();
        let func: Vec<Float> = if total.is_finite() {
            padded.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / n as Float; n]
        };

        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 0..n {
            cdf.push(cdf[i] + func[i]);
        }

        Self { func, cdf }
    }

    /// Returns the number of intervals.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Locates the CDF bracket containing `u` and returns its index together
    /// with the fractional position of `u` inside it, in [0, 1]. A bracket
    /// whose CDF span is below `CDF_SPAN_EPSILON` returns offset 0.
    ///
    /// - `u` - The sample in [0, 1).
    pub fn sample_continuous(&self, u: Float) -> (usize, Float) {
        // Find surrounding CDF segments and `offset`.
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);

        // Compute offset along CDF segment.
        let span = self.cdf[offset + 1] - self.cdf[offset];
        let du = if span < CDF_SPAN_EPSILON {
            0.0
        } else {
            clamp((u - self.cdf[offset]) / span, 0.0, 1.0)
        };

        (offset, du)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
