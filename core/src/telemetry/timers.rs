// ## src/telemetry/timers.rs

//! telemetry/timers.rs
//! Stage timers for one encrypt/decrypt operation.
//!
//! Summary: records durations for read, prepare, plan, transform, gather,
//! assemble, unpad, and write stages. Rank-local stage times are summed into the
//! assembler's timer, so `Transform` is total work across ranks, not wall time.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Read,
    Prepare,
    Plan,
    Transform,
    Gather,
    Assemble,
    Unpad,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read      => "read",
            Stage::Prepare   => "prepare",
            Stage::Plan      => "plan",
            Stage::Transform => "transform",
            Stage::Gather    => "gather",
            Stage::Assemble  => "assemble",
            Stage::Unpad     => "unpad",
            Stage::Write     => "write",
        };
        f.write_str(name)
    }
}

/// Accumulated duration per stage. Ordered by stage, so reports list stages
/// in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTimes {
    times: BTreeMap<Stage, Duration>,
}

impl StageTimes {
    /// Charge `dur` to `stage`, on top of anything already recorded.
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_default() += dur;
    }

    /// Run `f` and charge its wall time to `stage`.
    pub fn measure<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let t = Instant::now();
        let out = f();
        self.add(stage, t.elapsed());
        out
    }

    /// Recorded duration for `stage`, zero if it never ran.
    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or_default()
    }

    pub fn get_ms(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1e3
    }

    pub fn total(&self) -> Duration {
        self.times.values().sum()
    }

    /// True when every listed stage was recorded.
    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| self.times.contains_key(s))
    }

    /// Fold another rank's stage times into this one.
    pub fn merge(&mut self, other: &StageTimes) {
        for (&stage, &dur) in other {
            self.add(stage, dur);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stage, &Duration)> {
        self.times.iter()
    }
}

impl IntoIterator for StageTimes {
    type Item = (Stage, Duration);
    type IntoIter = btree_map::IntoIter<Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.into_iter()
    }
}

impl<'a> IntoIterator for &'a StageTimes {
    type Item = (&'a Stage, &'a Duration);
    type IntoIter = btree_map::Iter<'a, Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    pub start_time: Instant,
    pub end_time: Option<Instant>,
    pub stage_times: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            stage_times: StageTimes::default(),
        }
    }

    /// Stop the wall clock. Calling again moves the end mark.
    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    /// Wall time from start to `finish`, or to now while still running.
    pub fn elapsed(&self) -> Duration {
        self.end_time
            .unwrap_or_else(Instant::now)
            .saturating_duration_since(self.start_time)
    }
}
