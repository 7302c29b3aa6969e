// ## 📂 File: `src/engine/local.rs`

//! engine/local.rs
//! Local parallel transformer: one worker's chunk, fanned out block by block.
//!
//! Responsibilities:
//! - Split a block-aligned chunk into 16-byte blocks
//! - Transform blocks concurrently on a worker-owned thread pool
//! - Write block `i` to output offset `i * 16`
//!
//! Non-responsibilities:
//! - Padding
//! - Chunk planning
//! - Cross-worker ordering
//!
//! The output buffer is allocated up front and handed to the pool as disjoint
//! 16-byte mutable slots, so completion order never matters and nothing is locked.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::constants::BLOCK_SIZE;
use crate::crypto::{BlockCipherAdapter, CryptoError};
use crate::types::PipelineError;

pub struct LocalTransformer {
    pool: ThreadPool,
}

impl LocalTransformer {
    /// Build a transformer backed by `threads` execution units.
    pub fn new(threads: usize, rank: usize) -> Result<Self, PipelineError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(move |i| format!("pixcrypt-w{rank}-b{i}"))
            .build()
            .map_err(|e| PipelineError::Validation(format!("block pool init failed: {e}")))?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Transform `chunk` block by block. Output has the same length as the input.
    ///
    /// The first failing block aborts the whole chunk; no partial output is returned.
    pub fn transform(
        &self,
        chunk: &[u8],
        adapter: &BlockCipherAdapter,
    ) -> Result<Vec<u8>, CryptoError> {
        if chunk.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::UnalignedInput { len: chunk.len() });
        }

        let mut out = vec![0u8; chunk.len()];
        if chunk.is_empty() {
            return Ok(out);
        }

        self.pool.install(|| {
            chunk
                .par_chunks_exact(BLOCK_SIZE)
                .zip(out.par_chunks_exact_mut(BLOCK_SIZE))
                .try_for_each(|(input, output)| adapter.transform_block(input, output))
        })?;

        Ok(out)
    }
}
