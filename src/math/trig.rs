//! Table-driven trigonometry.
//!
//! Each approximator maps its input into table-index space, floors it with
//! [`float_to_int_floor`], and linearly interpolates between two adjacent
//! samples. Cost is constant and independent of the input's magnitude.

use bevy::prelude::*;
use std::sync::Arc;

use super::bits::{fabs, float_to_int_floor};
use super::config::MathConfig;
use super::diagnostics::{ContractViolation, DiagnosticHook, ViolationKind};
use super::precise;
use super::tables::{
    TrigTables, ARC_TABLE_HALF, ARC_TABLE_SIZE, SIN_TABLE_MASK, SIN_TABLE_SIZE,
};

/// Radians to sine-table index units.
const SIN_SCALE: f32 = SIN_TABLE_SIZE as f32 / (2.0 * precise::PI);

/// Ratio in `[-1, 1]` to signed arc-table index units.
const ARC_SCALE: f32 = (ARC_TABLE_SIZE / 2) as f32;

/// Beyond this magnitude the arc curves are too steep for linear
/// interpolation, so `fast_acos`/`fast_asin` use the precise functions.
pub const ARC_TABLE_LIMIT: f32 = 0.975;

/// Shared handle to the trig tables.
///
/// Cloning is cheap and every clone reads the same tables. Building a
/// `GameMath` is the one initialization; [`GameMath::shutdown`] (or dropping
/// the last clone) releases the tables.
#[derive(Resource, Clone, Debug)]
pub struct GameMath {
    tables: Arc<TrigTables>,
    hook: DiagnosticHook,
}

impl GameMath {
    /// Builds the tables with the default diagnostic hook.
    pub fn init() -> Self {
        Self::with_hook(DiagnosticHook::default())
    }

    pub fn with_hook(hook: DiagnosticHook) -> Self {
        Self {
            tables: Arc::from(TrigTables::build()),
            hook,
        }
    }

    pub fn from_config(config: &MathConfig) -> Self {
        Self::with_hook(DiagnosticHook::new(config.contract_mode))
    }

    #[inline]
    pub fn tables(&self) -> &TrigTables {
        &self.tables
    }

    #[inline]
    pub fn hook(&self) -> &DiagnosticHook {
        &self.hook
    }

    /// Number of live handles sharing these tables, this one included.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.tables)
    }

    /// Releases this handle. Reports [`ViolationKind::ShutdownWhileShared`]
    /// when other handles still read the tables; the memory is then freed
    /// once the last of them drops.
    pub fn shutdown(self) {
        let GameMath { tables, hook } = self;
        match Arc::try_unwrap(tables) {
            Ok(tables) => {
                drop(tables);
                info!("GameMath shut down, trig tables released");
            }
            Err(shared) => {
                hook.fire(ContractViolation::new(
                    ViolationKind::ShutdownWhileShared,
                    "GameMath shut down while other handles still use the tables",
                ));
                drop(shared);
            }
        }
    }

    #[inline]
    pub fn fast_sin(&self, angle: f32) -> f32 {
        self.sin_lookup(angle * SIN_SCALE)
    }

    #[inline]
    pub fn fast_cos(&self, angle: f32) -> f32 {
        self.sin_lookup((angle + precise::PI * 0.5) * SIN_SCALE)
    }

    /// `1 / fast_sin(angle)`; infinite where the interpolated sine is zero.
    #[inline]
    pub fn fast_inv_sin(&self, angle: f32) -> f32 {
        1.0 / self.fast_sin(angle)
    }

    /// `1 / fast_cos(angle)`; infinite where the interpolated cosine is zero.
    #[inline]
    pub fn fast_inv_cos(&self, angle: f32) -> f32 {
        1.0 / self.fast_cos(angle)
    }

    #[inline]
    pub fn fast_acos(&self, value: f32) -> f32 {
        if fabs(value) > ARC_TABLE_LIMIT {
            return precise::acos(value);
        }
        self.arc_lookup(self.tables.acos_table(), value, precise::acos)
    }

    #[inline]
    pub fn fast_asin(&self, value: f32) -> f32 {
        if fabs(value) > ARC_TABLE_LIMIT {
            return precise::asin(value);
        }
        self.arc_lookup(self.tables.asin_table(), value, precise::asin)
    }

    /// Interpolates the sine table at `val` (already in index units). The
    /// mask wraps any `|val| < 2^31` into range, which is `|angle|` up to
    /// about 1.3e7 rad. Beyond that the floor is unspecified and so is the
    /// result.
    #[inline]
    fn sin_lookup(&self, val: f32) -> f32 {
        let idx0 = float_to_int_floor(val);
        let idx1 = idx0.wrapping_add(1);
        let frac = val - idx0 as f32;
        let idx0 = (idx0 as u32 & SIN_TABLE_MASK) as usize;
        let idx1 = (idx1 as u32 & SIN_TABLE_MASK) as usize;

        let table = self.tables.sin_table();
        (1.0 - frac) * table[idx0] + frac * table[idx1]
    }

    #[inline]
    fn arc_lookup(
        &self,
        table: &[f32; ARC_TABLE_SIZE],
        value: f32,
        precise_fn: fn(f32) -> f32,
    ) -> f32 {
        let val = value * ARC_SCALE;
        let idx0 = float_to_int_floor(val);
        let frac = val - idx0 as f32;
        let idx0 = idx0.wrapping_add(ARC_TABLE_HALF);
        let idx1 = idx0.wrapping_add(1);

        let s0 = usize::try_from(idx0).ok().and_then(|i| table.get(i));
        let s1 = usize::try_from(idx1).ok().and_then(|i| table.get(i));
        self.hook.check(
            s0.is_some() && s1.is_some(),
            ContractViolation::new(
                ViolationKind::ArcIndexOutOfRange,
                "arc table index out of range, input outside [-1, 1]",
            )
            .with_value(value),
        );
        match (s0, s1) {
            (Some(&a), Some(&b)) => (1.0 - frac) * a + frac * b,
            _ => precise_fn(value),
        }
    }
}

#[cfg(test)]
mod tests;
