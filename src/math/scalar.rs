//! Scalar helpers used throughout the simulation.

use super::precise::PI;

/// +1, -1 or 0 by exact comparison against zero. NaN maps to 0.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        return 1.0;
    }
    if value < 0.0 {
        return -1.0;
    }
    0.0
}

/// Folds `value` into `[min, max)` with at most one subtraction and one
/// addition of the range width, then clamps.
///
/// Inputs more than one width outside the range are clamped rather than
/// reduced modulo the width. Existing callers depend on that.
#[inline]
pub fn wrap(mut value: f32, min: f32, max: f32) -> f32 {
    let width = max - min;
    if value >= max {
        value -= width;
    }
    if value < min {
        value += width;
    }
    if value < min {
        value = min;
    }
    if value > max {
        value = max;
    }
    value
}

/// [`wrap`] into `[0, 1)`.
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    wrap(value, 0.0, 1.0)
}

/// `a + (b - a) * t`. `t` is not clamped, so values outside `[0, 1]`
/// extrapolate.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Integer lerp: the offset is computed in `f32` and truncated toward zero.
#[inline]
pub fn lerp_i32(a: i32, b: i32, t: f32) -> i32 {
    a.wrapping_add((b.wrapping_sub(a) as f32 * t) as i32)
}

/// `[0, 1]` to `[0, 255]`, truncating. Out-of-range inputs saturate.
#[inline]
pub fn unit_float_to_byte(value: f32) -> u8 {
    (value * 255.0) as u8
}

#[inline]
pub fn byte_to_unit_float(byte: u8) -> f32 {
    byte as f32 / 255.0
}

#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / PI
}

#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * PI / 180.0
}
