//! engine/mod.rs
//! Parallel transform engine: planning, per-rank transform, worker-group runtime, and the public API.
//!
//! Layers, bottom up:
//! - `planner`: block-aligned chunk ranges per rank
//! - `local`: one rank's chunk on a rayon pool
//! - `runtime`: rank group, IV broadcast, gather
//! - `coordinator`: what each rank does with the above
//! - `core` / `io`: whole-payload, whole-image and file entry points

pub mod planner;
pub mod parallelism;
pub mod local;
pub mod runtime;
pub mod coordinator;
pub mod io;
pub mod core;

pub use self::core::*;
pub use self::io::{InputSource, OutputSink};
pub use self::parallelism::ParallelismProfile;
pub use self::planner::{plan_all, plan_chunk, ChunkRange, PlanError};
pub use self::runtime::{Communicator, LocalCluster, RuntimeError, ThreadComm};
