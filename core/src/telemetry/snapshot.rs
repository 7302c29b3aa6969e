// ## src/telemetry/snapshot.rs

//! telemetry/snapshot.rs
//!
//! Immutable telemetry snapshot produced once an operation completes.
//! Serializable so the CLI can write it out as a JSON report.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_SIZE;
use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub blocks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub padding_bytes: u64,
    pub iv_bytes: u64,
    pub chunks: u64,
    pub workers: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            blocks: counters.blocks,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            padding_bytes: counters.padding_bytes,
            iv_bytes: counters.iv_bytes,
            chunks: counters.chunks,
            workers: counters.workers,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants: the cipher never changes length and
    /// processes whole blocks only.
    pub fn sanity_check(&self) -> bool {
        self.bytes_in == self.bytes_out && self.bytes_in == self.blocks * BLOCK_SIZE as u64
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
