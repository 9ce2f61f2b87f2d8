//! Scalar type, constants and small numeric helpers.

use super::clamp::*;
use num_traits::Num;
use std::ops::{Add, Mul};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// Guard added to transmittance factors, probability masses and reciprocals
/// so that empty regions never produce a division by zero.
pub const EPSILON: Float = 1e-10;

/// Length given to the last interval of every ray. It stands in for "the rest
/// of the ray" so that whatever the final sample sees is fully absorbed.
pub const FAR_DISTANCE: Float = 1e10;

/// Below this CDF span a bracket of the hierarchical sampler is treated as
/// empty.
pub const CDF_SPAN_EPSILON: Float = 1e-5;

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Logistic function squashing a logit into (0, 1).
///
/// * `x` - The logit.
#[inline(always)]
pub fn sigmoid(x: Float) -> Float {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of `sigmoid`. `p` is clamped to `[1e-6, 1 - 1e-6]` first.
///
/// * `p` - Probability in (0, 1).
#[inline(always)]
pub fn logit(p: Float) -> Float {
    let p = clamp(p, 1e-6, 1.0 - 1e-6);
    (p / (1.0 - p)).ln()
}

/// Rectified linear unit. NaN passes through unchanged.
///
/// * `x` - The value.
#[inline(always)]
pub fn relu(x: Float) -> Float {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

/// Returns `n` evenly spaced values over [0, 1], both ends included. A single
/// value is placed at 0.
///
/// * `n` - Number of values.
pub fn linspace(n: usize) -> Vec<Float> {
    match n {
        0 => vec![],
        1 => vec![0.0],
        _ => {
            let inv = 1.0 / (n - 1) as Float;
            (0..n).map(|i| i as Float * inv).collect()
        }
    }
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
/// The result is clamped to [0, size - 2] so it always names a valid bracket
/// `[i, i + 1]`.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    #[test]
    fn linspace_endpoints() {
        assert!(linspace(0).is_empty());
        assert_eq!(linspace(1), vec![0.0]);
        assert_eq!(linspace(5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn sigmoid_and_relu() {
        assert!(approx_eq!(f32, sigmoid(0.0), 0.5));
        assert!(sigmoid(50.0) > 0.999);
        assert!(sigmoid(-50.0) < 0.001);
        assert_eq!(relu(-3.0), 0.0);
        assert_eq!(relu(2.5), 2.5);
        assert!(relu(Float::NAN).is_nan());
    }

    #[test]
    fn logit_inverts_sigmoid() {
        assert!(approx_eq!(f32, logit(0.5), 0.0));
        assert!(approx_eq!(f32, sigmoid(logit(0.2)), 0.2, epsilon = 1e-5));
        assert!(logit(1.0).is_finite());
        assert!(logit(0.0).is_finite());
    }

    #[test]
    fn find_interval_brackets() {
        let cdf = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.0), 0);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.3), 1);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.75), 2);
        // Values at or above the last entry land in the last bracket.
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 1.0), 2);
        // Values below the first entry land in the first bracket.
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= -1.0), 0);
    }

    proptest! {
        #[test]
        fn lerp_stays_between(a in -100.0..100.0f32, b in -100.0..100.0f32, t in 0.0..1.0f32) {
            let v = lerp(t, a, b);
            prop_assert!(v >= min(a, b) - 1e-3 && v <= max(a, b) + 1e-3);
        }
    }
}
