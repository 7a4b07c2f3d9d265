//! Deterministic fast math for lockstep simulation.
//!
//! Table-driven trigonometry, bit-exact float-to-integer conversion and the
//! scalar helpers built on them. Every function here produces the same bits on
//! every platform, compiler and optimization level, and none of them consult
//! the floating-point rounding mode.

pub mod math;
