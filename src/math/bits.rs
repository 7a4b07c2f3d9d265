//! Bit-level float codec.
//!
//! Everything in this module works on the IEEE-754 binary32 encoding through
//! [`f32::to_bits`] / [`f32::from_bits`]. No conversion here goes through the
//! FPU's float-to-int path, so the result never depends on the current
//! rounding mode or on whether the compiler emitted x87 or SSE code.
//!
//! The floor/chop conversions rely on two's complement integers (arithmetic
//! right shift of a negative `i32` yields all ones). Rust guarantees this on
//! every target.

const SIGN_MASK: u32 = 0x8000_0000;
const EXPONENT_MASK: u32 = 0x7F80_0000;
const MANTISSA_MASK: i32 = (1 << 23) - 1;
const IMPLICIT_ONE: i32 = 1 << 23;
const EXPONENT_BIAS: i32 = 127;

/// Raw view of an `f32`: 1 sign bit, 8 biased exponent bits, 23 mantissa bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawBits32(pub u32);

impl RawBits32 {
    #[inline]
    pub fn of(value: f32) -> Self {
        Self(value.to_bits())
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        f32::from_bits(self.0)
    }

    #[inline]
    pub fn sign_bit(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    /// Exponent field as stored (0..=255).
    #[inline]
    pub fn biased_exponent(self) -> u32 {
        (self.0 & EXPONENT_MASK) >> 23
    }

    /// Mantissa field without the implicit leading one.
    #[inline]
    pub fn mantissa(self) -> u32 {
        self.0 & MANTISSA_MASK as u32
    }
}

/// Absolute value by clearing the sign bit. NaN payloads pass through.
#[inline]
pub fn fabs(value: f32) -> f32 {
    RawBits32(RawBits32::of(value).0 & !SIGN_MASK).to_f32()
}

/// Truncating float-to-int conversion decoded straight from the bits.
///
/// Values with `|f| < 1` return 0. Magnitudes of 2^31 and above are not
/// representable; the result is unspecified but the call never panics.
#[inline]
pub fn float_to_int_chop(f: f32) -> i32 {
    let a = f.to_bits() as i32;
    let sign = a >> 31;
    let mantissa = (a & MANTISSA_MASK) | IMPLICIT_ONE;
    let exponent = ((a & 0x7fff_ffff) >> 23) - EXPONENT_BIAS;
    // Shift counts wrap modulo 32, which is what the x86 shifter does too.
    let r = ((mantissa as u32) << 8).wrapping_shr((31 - exponent) as u32) as i32;

    ((r ^ sign).wrapping_sub(sign)) & !(exponent >> 31)
}

/// Flooring float-to-int conversion decoded straight from the bits.
///
/// Negative non-integers round toward negative infinity. The adjustment is
/// done with all-ones/all-zeros masks, so there is no data-dependent branch.
#[inline]
pub fn float_to_int_floor(f: f32) -> i32 {
    let mut a = f.to_bits() as i32;
    let sign = a >> 31;
    a &= 0x7fff_ffff;
    let exponent = (a >> 23) - EXPONENT_BIAS;
    // All ones when |f| >= 1, zero otherwise.
    let expsign = !(exponent >> 31);
    let shift = (31 - exponent) as u32;
    // Bits of `mantissa << 8` lying below the binary point.
    let imask = 1i32.wrapping_shl(shift).wrapping_sub(1);
    let mantissa = a & MANTISSA_MASK;
    let r = (((mantissa | IMPLICIT_ONE) as u32) << 8).wrapping_shr(shift) as i32;

    let is_integral = (((mantissa << 8) & imask) == 0) as i32;
    // (a - 1) >> 31 is all ones only for +-0.0.
    let keep = is_integral & (expsign ^ ((a - 1) >> 31));

    ((r & expsign) ^ sign).wrapping_add(keep & sign)
}

/// Truncating conversion through the language cast (saturates out of range).
#[inline]
pub fn float_to_long(f: f32) -> i32 {
    f as i32
}

/// False for +-infinity and every NaN encoding; true for all finite values.
#[inline]
pub fn is_valid_float(x: f32) -> bool {
    RawBits32::of(x).biased_exponent() != 0xFF
}

/// Sign-bit test. `+0.0` is positive, `-0.0` is not.
#[inline]
pub fn fast_is_float_positive(value: f32) -> bool {
    !RawBits32::of(value).sign_bit()
}
