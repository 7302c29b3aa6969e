//! telemetry/mod.rs
//! Counters, stage timers, and the immutable snapshot reported after an operation.
//!
//! Notes:
//! - Ranks never share counters; each rank fills its own and the assembler merges.
//! - The snapshot is plain data (serde), written by the CLI with `--report`.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
