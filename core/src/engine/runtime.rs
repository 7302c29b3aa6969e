// ## 📂 File: `src/engine/runtime.rs`

//! engine/runtime.rs
//! Worker-group runtime: rank/size, IV broadcast, and the final gather barrier.
//!
//! `Communicator` is the seam the coordinator is written against. `LocalCluster`
//! implements it with one OS thread per rank wired together by crossbeam
//! channels:
//!
//! ```text
//!            iv (bounded 1 per member)
//!   rank 0 ───────────────────────────▶ rank 1..W
//!   rank 0 ◀─────────────────────────── rank 1..W
//!            (rank, item) gather (unbounded, many-to-one)
//! ```
//!
//! Failure model: a rank that fails simply returns, dropping its channel ends.
//! Peers blocked on that rank observe a disconnect and fail too, so the
//! operation can never complete with a missing chunk.

use std::collections::BTreeMap;
use std::thread;

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use thiserror::Error;

use crate::constants::{ASSEMBLER_RANK, MAX_WORKERS};
use crate::crypto::Iv;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("invalid worker group size {size}, must be within 1..={max}", max = MAX_WORKERS)]
    InvalidSize { size: usize },

    #[error("root rank must provide the broadcast value")]
    MissingBroadcastValue,

    #[error("root rank became unavailable")]
    RootUnavailable,

    #[error("gather incomplete: received {received} of {expected} reports")]
    GatherIncomplete { received: usize, expected: usize },

    #[error("rank {rank} reported twice")]
    DuplicateReport { rank: usize },

    #[error("failed to spawn rank {rank}: {reason}")]
    SpawnFailed { rank: usize, reason: String },

    #[error("rank {rank} panicked")]
    WorkerPanicked { rank: usize },
}

/// Collective operations available to a rank.
pub trait Communicator {
    /// Value each rank contributes to the gather.
    type Item: Send;

    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Rank that seeds broadcasts and receives the gather.
    fn root(&self) -> usize;

    fn is_root(&self) -> bool {
        self.rank() == self.root()
    }

    /// Root passes `Some(iv)`; every rank returns the root's value.
    fn broadcast_iv(&self, value: Option<Iv>) -> Result<Iv, RuntimeError>;

    /// Root returns every rank's item in rank order; other ranks return `None`.
    fn gather(&self, item: Self::Item) -> Result<Option<Vec<Self::Item>>, RuntimeError>;
}

enum Role<T> {
    Root {
        iv_txs: Vec<Sender<Iv>>,
        gather_rx: Receiver<(usize, T)>,
    },
    Member {
        iv_rx: Receiver<Iv>,
        gather_tx: Sender<(usize, T)>,
    },
}

/// In-process communicator endpoint for one rank of a `LocalCluster`.
pub struct ThreadComm<T> {
    rank: usize,
    size: usize,
    root: usize,
    role: Role<T>,
}

impl<T: Send> Communicator for ThreadComm<T> {
    type Item = T;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn root(&self) -> usize {
        self.root
    }

    fn broadcast_iv(&self, value: Option<Iv>) -> Result<Iv, RuntimeError> {
        match &self.role {
            Role::Root { iv_txs, .. } => {
                let iv = value.ok_or(RuntimeError::MissingBroadcastValue)?;
                for tx in iv_txs {
                    // A member that already failed is reported by its own result.
                    let _ = tx.send(iv);
                }
                Ok(iv)
            }
            Role::Member { iv_rx, .. } => iv_rx.recv().map_err(|_| RuntimeError::RootUnavailable),
        }
    }

    fn gather(&self, item: T) -> Result<Option<Vec<T>>, RuntimeError> {
        match &self.role {
            Role::Member { gather_tx, .. } => {
                gather_tx
                    .send((self.rank, item))
                    .map_err(|_| RuntimeError::RootUnavailable)?;
                Ok(None)
            }
            Role::Root { gather_rx, .. } => {
                let mut pending = BTreeMap::new();
                pending.insert(self.rank, item);

                while pending.len() < self.size {
                    let (rank, body) = gather_rx.recv().map_err(|_| RuntimeError::GatherIncomplete {
                        received: pending.len(),
                        expected: self.size,
                    })?;
                    if pending.insert(rank, body).is_some() {
                        return Err(RuntimeError::DuplicateReport { rank });
                    }
                }

                Ok(Some(pending.into_values().collect()))
            }
        }
    }
}

/// Fixed-size group of ranks running as threads of the current process.
#[derive(Debug, Clone, Copy)]
pub struct LocalCluster {
    size: usize,
    root: usize,
}

impl LocalCluster {
    pub fn new(size: usize) -> Result<Self, RuntimeError> {
        if size == 0 || size > MAX_WORKERS {
            return Err(RuntimeError::InvalidSize { size });
        }
        Ok(Self { size, root: ASSEMBLER_RANK })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Wire one endpoint per rank, in rank order.
    pub fn communicators<T: Send>(&self) -> Vec<ThreadComm<T>> {
        let (gather_tx, gather_rx) = unbounded::<(usize, T)>();

        let mut iv_txs = Vec::with_capacity(self.size - 1);
        let mut members = Vec::with_capacity(self.size - 1);
        for rank in (0..self.size).filter(|&r| r != self.root) {
            let (tx, rx) = bounded::<Iv>(1);
            iv_txs.push(tx);
            members.push(ThreadComm {
                rank,
                size: self.size,
                root: self.root,
                role: Role::Member { iv_rx: rx, gather_tx: gather_tx.clone() },
            });
        }
        drop(gather_tx);

        let root = ThreadComm {
            rank: self.root,
            size: self.size,
            root: self.root,
            role: Role::Root { iv_txs, gather_rx },
        };

        let mut all = Vec::with_capacity(self.size);
        all.push(root);
        all.extend(members);
        all.sort_by_key(|c| c.rank);
        all
    }

    /// Run `f` once per rank, each on its own thread, and join them all.
    ///
    /// Results come back in rank order. The group is established before any rank
    /// starts and never grows or shrinks.
    pub fn run<T, R, E, F>(&self, f: F) -> Result<Vec<Result<R, E>>, RuntimeError>
    where
        T: Send,
        R: Send,
        E: Send,
        F: Fn(ThreadComm<T>) -> Result<R, E> + Sync,
    {
        let comms = self.communicators::<T>();
        let f = &f;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.size);
            for comm in comms {
                let rank = comm.rank;
                let handle = thread::Builder::new()
                    .name(format!("pixcrypt-rank-{rank}"))
                    .spawn_scoped(scope, move || f(comm))
                    .map_err(|e| RuntimeError::SpawnFailed { rank, reason: e.to_string() })?;
                handles.push((rank, handle));
            }

            handles
                .into_iter()
                .map(|(rank, h)| h.join().map_err(|_| RuntimeError::WorkerPanicked { rank }))
                .collect()
        })
    }
}
