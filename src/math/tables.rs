//! Precomputed trigonometry tables.
//!
//! Samples are evaluated in double precision with `libm` and rounded once to
//! `f32`, so every machine builds bit-identical tables.

use bevy::prelude::*;

use super::profiling::profile;

pub const SIN_TABLE_SIZE: usize = 1024;
pub const ARC_TABLE_SIZE: usize = 1024;

/// `SIN_TABLE_SIZE` is a power of two, so wrapping an index is a mask.
pub const SIN_TABLE_MASK: u32 = SIN_TABLE_SIZE as u32 - 1;

/// Offset mapping a signed arc index onto `[0, ARC_TABLE_SIZE)`.
pub const ARC_TABLE_HALF: i32 = (ARC_TABLE_SIZE / 2) as i32;

const _: () = assert!(SIN_TABLE_SIZE.is_power_of_two());

/// The four sample tables behind the fast approximators.
///
/// Immutable once built. Share it through [`GameMath`](super::GameMath),
/// which holds it behind an `Arc`.
pub struct TrigTables {
    sin: [f32; SIN_TABLE_SIZE],
    inv_sin: [f32; SIN_TABLE_SIZE],
    acos: [f32; ARC_TABLE_SIZE],
    asin: [f32; ARC_TABLE_SIZE],
}

impl TrigTables {
    /// Evaluates every sample.
    ///
    /// `inv_sin[0]` is `+inf` (reciprocal of an exact zero), following IEEE
    /// division.
    pub fn build() -> Box<Self> {
        let tables = fill_tables();
        info!(
            "Built trig tables: {} sine samples, {} arc samples",
            SIN_TABLE_SIZE, ARC_TABLE_SIZE
        );
        tables
    }

    /// `sin(i * 2pi / 1024)` for `i` in `[0, 1024)`.
    #[inline]
    pub fn sin_table(&self) -> &[f32; SIN_TABLE_SIZE] {
        &self.sin
    }

    /// Reciprocal of each sine sample. Nothing in this crate reads it; it is
    /// kept for callers that want a reciprocal lookup without the division.
    #[inline]
    pub fn inv_sin_table(&self) -> &[f32; SIN_TABLE_SIZE] {
        &self.inv_sin
    }

    /// `acos((i - 512) / 512)` for `i` in `[0, 1024)`.
    #[inline]
    pub fn acos_table(&self) -> &[f32; ARC_TABLE_SIZE] {
        &self.acos
    }

    /// `asin((i - 512) / 512)` for `i` in `[0, 1024)`.
    #[inline]
    pub fn asin_table(&self) -> &[f32; ARC_TABLE_SIZE] {
        &self.asin
    }
}

impl std::fmt::Debug for TrigTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrigTables")
            .field("sin_len", &self.sin.len())
            .field("arc_len", &self.acos.len())
            .finish_non_exhaustive()
    }
}

#[profile]
fn fill_tables() -> Box<TrigTables> {
    let mut tables = Box::new(TrigTables {
        sin: [0.0; SIN_TABLE_SIZE],
        inv_sin: [0.0; SIN_TABLE_SIZE],
        acos: [0.0; ARC_TABLE_SIZE],
        asin: [0.0; ARC_TABLE_SIZE],
    });

    for i in 0..SIN_TABLE_SIZE {
        let angle = 2.0 * core::f64::consts::PI * i as f64 / SIN_TABLE_SIZE as f64;
        let sample = libm::sin(angle) as f32;
        tables.sin[i] = sample;
        tables.inv_sin[i] = 1.0 / sample;
    }

    for i in 0..ARC_TABLE_SIZE {
        let ratio = (i as f64 - ARC_TABLE_HALF as f64) / ARC_TABLE_HALF as f64;
        tables.acos[i] = libm::acos(ratio) as f32;
        tables.asin[i] = libm::asin(ratio) as f32;
    }

    debug!(
        "Trig table footprint: {} bytes",
        std::mem::size_of::<TrigTables>()
    );
    tables
}
