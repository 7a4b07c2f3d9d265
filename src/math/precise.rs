//! Precise single-precision math and engine constants.
//!
//! These wrap `libm`, a pure software implementation, instead of the
//! platform C library. Its results only depend on IEEE-754 basic operations,
//! so the "precise" fallback path of the fast approximators is just as
//! reproducible across machines as the tables are.

pub const EPSILON: f32 = 0.0001;
pub const EPSILON2: f32 = EPSILON * EPSILON;
pub const PI: f32 = core::f32::consts::PI;
pub const FLOAT_MAX: f32 = f32::MAX;
pub const FLOAT_MIN: f32 = f32::MIN_POSITIVE;
pub const FLOAT_TINY: f32 = 1.0e-37;
pub const SQRT2: f32 = core::f32::consts::SQRT_2;
pub const SQRT3: f32 = 1.732_050_8;
pub const OOSQRT2: f32 = core::f32::consts::FRAC_1_SQRT_2;
pub const OOSQRT3: f32 = 0.577_350_26;

#[inline]
pub fn sin(x: f32) -> f32 {
    libm::sinf(x)
}

#[inline]
pub fn cos(x: f32) -> f32 {
    libm::cosf(x)
}

#[inline]
pub fn tan(x: f32) -> f32 {
    libm::tanf(x)
}

/// IEEE-754 requires correctly rounded square roots, so this is exact
/// everywhere.
#[inline]
pub fn sqrt(x: f32) -> f32 {
    libm::sqrtf(x)
}

#[inline]
pub fn inv_sqrt(x: f32) -> f32 {
    1.0 / libm::sqrtf(x)
}

#[inline]
pub fn acos(x: f32) -> f32 {
    libm::acosf(x)
}

#[inline]
pub fn asin(x: f32) -> f32 {
    libm::asinf(x)
}

#[inline]
pub fn atan(x: f32) -> f32 {
    libm::atanf(x)
}

#[inline]
pub fn atan2(y: f32, x: f32) -> f32 {
    libm::atan2f(y, x)
}

#[inline]
pub fn ceil(x: f32) -> f32 {
    libm::ceilf(x)
}

#[inline]
pub fn floor(x: f32) -> f32 {
    libm::floorf(x)
}
