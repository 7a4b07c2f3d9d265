//! Cross-platform determinism self-check.
//!
//! [`run_scenario`] drives the fast approximators over a fixed pseudo-random
//! input sequence and records every output bit pattern. Two machines agree
//! when their traces (or just their [`DeterminismTrace::digest`]) match.
//! Traces are saved as zlib-compressed bincode so a reference run on one
//! platform can be compared on another.

use bevy::prelude::*;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use super::precise::PI;
use super::profiling::profile;
use super::trig::GameMath;

pub const TRACE_VERSION: u32 = 1;
pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;
pub const DEFAULT_SCENARIO_SEED: u64 = 0x5EED_0F_1A7E_57;

/// Angles are drawn from `[-SPAN, SPAN]`, several turns either side of zero.
const ANGLE_SPAN: f32 = 8.0 * PI;

/// Outputs recorded per step: sin, cos, acos, asin.
pub const OUTPUTS_PER_STEP: usize = 4;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeterminismTrace {
    pub version: u32,
    pub seed: u64,
    pub sample_count: usize,
    /// `to_bits()` of every output, `OUTPUTS_PER_STEP` per step.
    pub outputs: Vec<u32>,
}

impl DeterminismTrace {
    /// CRC-32 over the little-endian output bits.
    pub fn digest(&self) -> u32 {
        let mut crc = Crc::new();
        for bits in &self.outputs {
            crc.update(&bits.to_le_bytes());
        }
        crc.sum()
    }

    /// Index of the first output that differs, or of the first missing one
    /// when the traces have different lengths.
    pub fn first_divergence(&self, other: &DeterminismTrace) -> Option<usize> {
        let mismatch = self
            .outputs
            .iter()
            .zip(other.outputs.iter())
            .position(|(a, b)| a != b);
        match mismatch {
            Some(i) => Some(i),
            None if self.outputs.len() != other.outputs.len() => {
                Some(self.outputs.len().min(other.outputs.len()))
            }
            None => None,
        }
    }
}

/// Maps the top 24 bits of a draw onto `[0, 1)` exactly.
#[inline]
fn unit_sample(rng: &mut StdRng) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Runs `count` steps, each evaluating `fast_sin`/`fast_cos` on one angle and
/// `fast_acos`/`fast_asin` on one ratio in `[-1, 1]`.
#[profile]
pub fn run_scenario(math: &GameMath, seed: u64, count: usize) -> DeterminismTrace {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut outputs = Vec::with_capacity(count * OUTPUTS_PER_STEP);

    for _ in 0..count {
        let angle = unit_sample(&mut rng) * (2.0 * ANGLE_SPAN) - ANGLE_SPAN;
        let ratio = unit_sample(&mut rng) * 2.0 - 1.0;

        outputs.push(math.fast_sin(angle).to_bits());
        outputs.push(math.fast_cos(angle).to_bits());
        outputs.push(math.fast_acos(ratio).to_bits());
        outputs.push(math.fast_asin(ratio).to_bits());
    }

    let trace = DeterminismTrace {
        version: TRACE_VERSION,
        seed,
        sample_count: count,
        outputs,
    };
    debug!(
        "Determinism scenario: seed {:#x}, {} steps, digest {:#010x}",
        seed,
        count,
        trace.digest()
    );
    trace
}

pub fn save_trace(
    path: &str,
    trace: &DeterminismTrace,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = ZlibEncoder::new(writer, Compression::default());
    bincode::serialize_into(&mut encoder, trace)?;
    encoder.finish()?;
    Ok(())
}

pub fn load_trace(path: &str) -> Result<DeterminismTrace, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut decoder = ZlibDecoder::new(reader);
    let trace: DeterminismTrace = bincode::deserialize_from(&mut decoder)?;
    if trace.version != TRACE_VERSION {
        return Err(format!(
            "trace version {} does not match expected {}",
            trace.version, TRACE_VERSION
        )
        .into());
    }
    Ok(trace)
}
