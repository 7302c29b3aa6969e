// ## 📂 File: `src/engine/planner.rs`

//! engine/planner.rs
//! Chunk planner: assigns each worker rank a contiguous, block-aligned byte range.
//!
//! Algorithm:
//! - Base chunk `C = T / W`.
//! - Seam `k` (0 < k < W) sits at `k * C` rounded down to a block boundary.
//!   Seam 0 is 0, seam W is T.
//! - Rank `r` owns `[seam(r), min(seam(r + 1), T))`.
//!
//! Invariants:
//! - Ranges are disjoint, gap-free, ordered by rank, and cover `[0, T)`.
//! - No cipher block straddles two ranks.
//! - Ranges may be empty when `T / W < 16`; the last rank then absorbs the tail.

use std::ops::Range;

use thiserror::Error;

use crate::constants::BLOCK_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("rank {rank} out of range for {workers} workers")]
    RankOutOfRange { rank: usize, workers: usize },

    /// Upstream padding defect: the payload handed to the planner is not block aligned.
    #[error("payload length {total} is not a multiple of {block}", block = BLOCK_SIZE)]
    UnalignedPayload { total: usize },
}

/// One rank's share of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub rank: usize,
    pub start: usize,
    pub end: usize,
}

impl ChunkRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn block_count(&self) -> usize {
        self.len() / BLOCK_SIZE
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[inline]
pub fn align_down(offset: usize) -> usize {
    offset - (offset % BLOCK_SIZE)
}

fn seam(total: usize, workers: usize, k: usize) -> usize {
    if k == 0 {
        0
    } else if k >= workers {
        total
    } else {
        align_down(k * (total / workers)).min(total)
    }
}

/// Plan the range owned by `rank` in a group of `workers`.
pub fn plan_chunk(total: usize, workers: usize, rank: usize) -> Result<ChunkRange, PlanError> {
    if workers == 0 {
        return Err(PlanError::NoWorkers);
    }
    if rank >= workers {
        return Err(PlanError::RankOutOfRange { rank, workers });
    }
    if total % BLOCK_SIZE != 0 {
        return Err(PlanError::UnalignedPayload { total });
    }

    let start = seam(total, workers, rank);
    let end = seam(total, workers, rank + 1).min(total);

    Ok(ChunkRange { rank, start, end })
}

/// Plan every rank, in rank order.
pub fn plan_all(total: usize, workers: usize) -> Result<Vec<ChunkRange>, PlanError> {
    (0..workers.max(1))
        .map(|rank| plan_chunk(total, workers, rank))
        .collect()
}
