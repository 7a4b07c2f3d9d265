//! Bounded random floats.
//!
//! These are the one part of the math core outside the determinism
//! guarantee: results follow whatever source is passed in. Seed [`MathRng`]
//! identically on every peer if the draws feed simulation state.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Entropy kept from each draw.
const RANDOM_MASK: u32 = 0xFFF;

/// Uniform-ish float in `[0, 1]` from 12 bits of `rng`.
#[inline]
pub fn random_float<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() & RANDOM_MASK) as f32 / RANDOM_MASK as f32
}

/// [`random_float`] mapped affinely onto `[min, max]`.
#[inline]
pub fn random_float_range<R: RngCore + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    random_float(rng) * (max - min) + min
}

/// Process-wide random source for game-math callers.
#[derive(Resource)]
pub struct MathRng(pub StdRng);

impl MathRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn random_float(&mut self) -> f32 {
        random_float(&mut self.0)
    }

    pub fn random_float_range(&mut self, min: f32, max: f32) -> f32 {
        random_float_range(&mut self.0, min, max)
    }
}
