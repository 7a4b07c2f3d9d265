//! Performance profiling utilities
//!
//! `#[profile]` only emits timing code when the `perf_stats` feature is
//! enabled. Table construction and the determinism scenario are annotated.

pub use gamemath_macros::profile;
