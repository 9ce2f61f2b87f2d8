//! Render Context

use crate::rng::*;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seed used by deterministic test renders.
pub const DETERMINISTIC_SEED: u64 = 0;

/// The explicit source of randomness for one render invocation. Every random
/// draw made while rendering ray `i` comes from the stream returned by
/// `ray_rng(i)`, so two invocations sharing a context produce identical
/// output no matter how the rays are chunked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderContext {
    /// Seed shared by all per-ray streams.
    seed: u64,

    /// Whether the context was created for a reproducible test render.
    deterministic: bool,
}

impl RenderContext {
    /// Create a context with the given seed.
    ///
    /// * `seed` - Seed shared by all per-ray streams.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            deterministic: false,
        }
    }

    /// Create a context for a reproducible test render with a fixed seed.
    pub fn deterministic() -> Self {
        Self {
            seed: DETERMINISTIC_SEED,
            deterministic: true,
        }
    }

    /// Create a context seeded once from the system clock.
    pub fn from_entropy() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(DETERMINISTIC_SEED);
        debug!("Render context seeded with {seed}");
        Self::new(seed)
    }

    /// Returns the seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true for deterministic test contexts.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Returns the random stream owned by the ray with the given global index.
    ///
    /// * `ray_index` - Index of the ray within the whole invocation.
    pub fn ray_rng(&self, ray_index: usize) -> RNG {
        RNG::with_seed(self.seed, ray_index as u64)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
