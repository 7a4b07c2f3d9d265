use super::*;
use crate::math::diagnostics::ContractMode;
use core::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Worst-case linear interpolation error over a 1024-sample sine table is
/// h^2/8 with h = 2pi/1024 (about 4.7e-6); this leaves room for the f32
/// rounding of the index computation.
const SIN_TOLERANCE: f32 = 1e-4;

/// acos'' peaks at the 0.975 cut-off, giving roughly 4.7e-5 there.
const ARC_TOLERANCE: f32 = 1e-4;

fn silent_math() -> GameMath {
    GameMath::with_hook(DiagnosticHook::new(ContractMode::Silent))
}

fn sweep(from: f32, to: f32, steps: usize) -> impl Iterator<Item = f32> {
    (0..=steps).map(move |i| from + (to - from) * (i as f32 / steps as f32))
}

#[test]
fn test_fast_sin_accuracy_over_dense_sweep() {
    let math = GameMath::init();
    let mut max_err = 0.0f32;

    for angle in sweep(-4.0 * PI, 4.0 * PI, 200_000) {
        let exact = libm::sin(angle as f64) as f32;
        let err = (math.fast_sin(angle) - exact).abs();
        max_err = max_err.max(err);
        assert!(err < SIN_TOLERANCE, "fast_sin({}) off by {}", angle, err);
    }

    println!("fast_sin max error over sweep: {}", max_err);
}

#[test]
fn test_fast_cos_accuracy_over_dense_sweep() {
    let math = GameMath::init();

    for angle in sweep(-4.0 * PI, 4.0 * PI, 200_000) {
        let exact = libm::cos(angle as f64) as f32;
        let err = (math.fast_cos(angle) - exact).abs();
        assert!(err < SIN_TOLERANCE, "fast_cos({}) off by {}", angle, err);
    }
}

#[test]
fn test_fast_sin_is_periodic() {
    let math = GameMath::init();
    let mut rng = fastrand::Rng::with_seed(2024);

    for _ in 0..5000 {
        let a = (rng.f32() * 2.0 - 1.0) * PI;
        let base = math.fast_sin(a);
        for k in -3..=3 {
            let shifted = math.fast_sin(a + k as f32 * TAU);
            assert!(
                (shifted - base).abs() < SIN_TOLERANCE,
                "fast_sin({}) = {} but shifted by {} turns gives {}",
                a, base, k, shifted
            );
        }
    }
}

#[test]
fn test_fast_sin_landmarks() {
    let math = GameMath::init();

    assert_eq!(math.fast_sin(0.0), 0.0);
    assert!((math.fast_sin(FRAC_PI_2) - 1.0).abs() < 1e-6);
    assert!((math.fast_cos(0.0) - 1.0).abs() < 1e-6);
    assert!((math.fast_cos(PI) + 1.0).abs() < 1e-6);
    // Large angles still wrap through the index mask.
    assert!((math.fast_sin(1000.0 * TAU + FRAC_PI_2) - 1.0).abs() < 1e-2);
}

#[test]
fn test_reciprocals() {
    let math = GameMath::init();

    assert_eq!(math.fast_inv_sin(0.0), f32::INFINITY);
    assert!(math.fast_inv_cos(FRAC_PI_2).abs() > 1.0e3);
    assert!((math.fast_inv_sin(FRAC_PI_2) - 1.0).abs() < 1e-5);
    assert!((math.fast_inv_cos(0.0) - 1.0).abs() < 1e-5);

    let a = 0.7;
    assert_eq!(math.fast_inv_sin(a), 1.0 / math.fast_sin(a));
    assert_eq!(math.fast_inv_cos(a), 1.0 / math.fast_cos(a));
}

#[test]
fn test_fast_acos_and_asin_accuracy_inside_table_range() {
    let math = GameMath::init();

    for x in sweep(-ARC_TABLE_LIMIT, ARC_TABLE_LIMIT, 100_000) {
        let acos_err = (math.fast_acos(x) - libm::acos(x as f64) as f32).abs();
        let asin_err = (math.fast_asin(x) - libm::asin(x as f64) as f32).abs();
        assert!(acos_err < ARC_TOLERANCE, "fast_acos({}) off by {}", x, acos_err);
        assert!(asin_err < ARC_TOLERANCE, "fast_asin({}) off by {}", x, asin_err);
    }
}

#[test]
fn test_edge_values_delegate_to_precise_functions() {
    let math = GameMath::init();

    for x in sweep(0.975_1, 1.0, 2000) {
        for v in [x, -x] {
            assert_eq!(math.fast_acos(v).to_bits(), precise::acos(v).to_bits(), "acos({})", v);
            assert_eq!(math.fast_asin(v).to_bits(), precise::asin(v).to_bits(), "asin({})", v);
        }
    }
    assert_eq!(math.fast_acos(1.0), 0.0);
    assert!((math.fast_acos(-1.0) - PI).abs() < 1e-6);
}

#[test]
fn test_out_of_domain_inputs_take_the_precise_path() {
    let hits = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let math = GameMath::with_hook(
        DiagnosticHook::new(ContractMode::Silent).with_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    assert!(math.fast_acos(1.5).is_nan());
    assert!(math.fast_asin(-7.0).is_nan());
    assert!(math.fast_acos(f32::INFINITY).is_nan());
    assert!(math.fast_acos(f32::NAN).is_nan());
    assert!(math.fast_asin(f32::NAN).is_nan());
    assert_eq!(hits.load(Ordering::SeqCst), 0, "no table read was out of range");
}

#[test]
fn test_arc_lookup_guard_fires_hook() {
    let hits = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let math = GameMath::with_hook(
        DiagnosticHook::new(ContractMode::Silent).with_callback(move |v| {
            assert_eq!(v.kind, ViolationKind::ArcIndexOutOfRange);
            assert_eq!(v.value, Some(3.0));
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let result = math.arc_lookup(math.tables().acos_table(), 3.0, precise::acos);
    assert!(result.is_nan());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_shutdown_while_shared_is_reported() {
    let hits = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let math = GameMath::with_hook(
        DiagnosticHook::new(ContractMode::Silent).with_callback(move |v| {
            assert_eq!(v.kind, ViolationKind::ShutdownWhileShared);
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let reader = math.clone();
    assert_eq!(math.handle_count(), 2);
    math.shutdown();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The surviving handle keeps working and is the only owner now.
    assert_eq!(reader.handle_count(), 1);
    assert_eq!(reader.fast_sin(0.0), 0.0);
    reader.shutdown();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clones_share_tables() {
    let math = silent_math();
    let other = math.clone();
    assert!(std::ptr::eq(math.tables(), other.tables()));
    assert_eq!(math.fast_asin(0.3).to_bits(), other.fast_asin(0.3).to_bits());
}

#[test]
fn test_sin_lookup_wraps_large_indices() {
    let math = silent_math();
    // Both stay below 2^31 index units and are exact in f32.
    assert_eq!(math.sin_lookup(1_024_000_256.0), 1.0);
    assert_eq!(math.sin_lookup(-1_023_999_232.0), -1.0);
    assert_eq!(math.sin_lookup(1024.0 * 4096.0), 0.0);
}
