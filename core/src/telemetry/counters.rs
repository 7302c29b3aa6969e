// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected while a payload is transformed.
//!
//! Summary: each rank counts its own blocks and bytes; the assembler merges the
//! per-rank counters after the gather and adds the payload-level overhead
//! (padding, IV prefix). Converted into an immutable `TelemetrySnapshot` at the end.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_SIZE;

/// Deterministic counters collected during one operation.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// 16-byte blocks passed through the cipher.
    pub blocks: u64,
    /// Bytes handed to the cipher (after padding / IV split).
    pub bytes_in: u64,
    /// Bytes produced by the cipher.
    pub bytes_out: u64,
    /// Padding bytes added (encrypt) or stripped (decrypt).
    pub padding_bytes: u64,
    /// IV bytes prepended (encrypt) or split off (decrypt).
    pub iv_bytes: u64,
    /// Non-empty chunks processed.
    pub chunks: u64,
    /// Ranks that reported in the gather.
    pub workers: u64,
}

impl TelemetryCounters {
    /// Record one rank's chunk.
    pub fn add_chunk(&mut self, in_len: usize, out_len: usize) {
        if in_len > 0 {
            self.chunks += 1;
        }
        self.blocks += (in_len / BLOCK_SIZE) as u64;
        self.bytes_in += in_len as u64;
        self.bytes_out += out_len as u64;
    }

    pub fn add_padding(&mut self, len: usize) {
        self.padding_bytes += len as u64;
    }

    pub fn add_iv(&mut self, len: usize) {
        self.iv_bytes += len as u64;
    }

    pub fn add_worker(&mut self) {
        self.workers += 1;
    }

    // Per-rank counters are merged once on the assembler: no locks, no atomics.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.blocks += other.blocks;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.padding_bytes += other.padding_bytes;
        self.iv_bytes += other.iv_bytes;
        self.chunks += other.chunks;
        self.workers += other.workers;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
