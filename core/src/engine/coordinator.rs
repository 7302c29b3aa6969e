// ## 📂 File: `src/engine/coordinator.rs`

//! engine/coordinator.rs
//! Per-rank driver: IV agreement, chunk planning, local transform, gather, assembly.
//!
//! Flow (every rank runs `run_rank` with the same prepared payload):
//!
//! ```text
//!  prepare (once, before launch)      pad on encrypt / split IV on CBC decrypt
//!  broadcast_iv (CBC encrypt only)    rank 0 draws the IV, everyone receives it
//!  plan_chunk(T, W, rank)             block-aligned [start, end)
//!  LocalTransformer::transform        blocks in parallel on the rank's pool
//!  gather                             rank 0 receives every report in rank order
//!  assemble (rank 0)                  IV prefix on CBC encrypt, unpad on decrypt
//! ```
//!
//! A rank that fails after the IV agreement still takes part in the gather,
//! contributing its error instead of a chunk, so the assembler aborts with the
//! real cause and never emits a partial payload.

use std::time::Instant;

use bytes::Bytes;

use crate::constants::{BLOCK_SIZE, IV_LEN};
use crate::crypto::{
    generate_iv, pad, split_iv, unpad, BlockCipherAdapter, CipherMode, CryptoError, Iv, Key,
    Operation, PaddingPolicy,
};
use crate::engine::local::LocalTransformer;
use crate::engine::planner::{plan_chunk, ChunkRange};
use crate::engine::runtime::Communicator;
use crate::telemetry::{Stage, StageTimes, TelemetryCounters};
use crate::types::PipelineError;

/// Operation parameters shared read-only by every rank.
#[derive(Debug, Clone)]
pub struct RankJob {
    pub operation: Operation,
    pub mode: CipherMode,
    pub key: Key,
    pub padding: PaddingPolicy,
    pub threads_per_worker: usize,
}

/// Payload after the one-time preparation step.
#[derive(Debug, Clone)]
pub struct PreparedPayload {
    /// Block-aligned bytes the planner splits across ranks.
    pub body: Bytes,
    /// IV read from the ciphertext (CBC decrypt only).
    pub iv: Option<Iv>,
    /// Padding bytes appended (encrypt only).
    pub padding_added: usize,
}

/// What one rank contributes to the gather.
#[derive(Debug)]
pub struct RankReport {
    pub range: ChunkRange,
    pub output: Vec<u8>,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
}

/// Gathered item: a finished chunk or the reason the rank failed.
pub type RankOutcome = Result<RankReport, PipelineError>;

/// Final payload produced by the assembler rank.
#[derive(Debug)]
pub struct AssembledPayload {
    pub bytes: Vec<u8>,
    pub iv: Option<Iv>,
    pub counters: TelemetryCounters,
    pub stage_times: StageTimes,
}

/// Pad for encryption; split off the IV and check alignment for decryption.
pub fn prepare_payload(
    payload: Bytes,
    operation: Operation,
    mode: CipherMode,
) -> Result<PreparedPayload, PipelineError> {
    match operation {
        Operation::Encrypt => {
            let padded = pad(&payload);
            let padding_added = padded.len() - payload.len();
            Ok(PreparedPayload { body: Bytes::from(padded), iv: None, padding_added })
        }
        Operation::Decrypt => {
            let (iv, body) = if mode.uses_iv() {
                let (iv, _) = split_iv(&payload)
                    .ok_or(CryptoError::TruncatedCiphertext { len: payload.len() })?;
                (Some(iv), payload.slice(IV_LEN..))
            } else {
                (None, payload)
            };

            if body.len() % BLOCK_SIZE != 0 {
                return Err(CryptoError::UnalignedInput { len: body.len() }.into());
            }
            Ok(PreparedPayload { body, iv, padding_added: 0 })
        }
    }
}

/// Drive one rank through the operation.
///
/// Returns `Some` on the assembler rank and `None` everywhere else.
pub fn run_rank<C>(
    comm: &C,
    job: &RankJob,
    prepared: &PreparedPayload,
) -> Result<Option<AssembledPayload>, PipelineError>
where
    C: Communicator<Item = RankOutcome>,
{
    let rank = comm.rank();
    let span = tracing::debug_span!("rank", rank, workers = comm.size());
    let _guard = span.enter();

    let iv = agree_on_iv(comm, job, prepared)?;

    let outcome = transform_chunk(rank, comm.size(), job, &prepared.body, iv);
    if let Err(e) = &outcome {
        tracing::error!(rank, error = %e, "chunk transform failed");
    }

    let gather_start = Instant::now();
    let Some(reports) = comm.gather(outcome)? else {
        return Ok(None);
    };
    let gather_time = gather_start.elapsed();

    let mut assembled = assemble(job, prepared, iv, reports)?;
    assembled.stage_times.add(Stage::Gather, gather_time);
    Ok(Some(assembled))
}

fn agree_on_iv<C: Communicator>(
    comm: &C,
    job: &RankJob,
    prepared: &PreparedPayload,
) -> Result<Option<Iv>, PipelineError> {
    if !job.mode.uses_iv() {
        return Ok(None);
    }
    match job.operation {
        Operation::Encrypt => {
            let seed = if comm.is_root() { Some(generate_iv()?) } else { None };
            Ok(Some(comm.broadcast_iv(seed)?))
        }
        Operation::Decrypt => prepared
            .iv
            .map(Some)
            .ok_or(CryptoError::MissingIv { mode: job.mode }.into()),
    }
}

fn transform_chunk(
    rank: usize,
    workers: usize,
    job: &RankJob,
    body: &Bytes,
    iv: Option<Iv>,
) -> RankOutcome {
    let mut stage_times = StageTimes::default();

    let range = stage_times.measure(Stage::Plan, || plan_chunk(body.len(), workers, rank))?;
    let adapter = BlockCipherAdapter::new(job.key.clone(), job.mode, job.operation, iv)?;
    let transformer = LocalTransformer::new(job.threads_per_worker, rank)?;

    let chunk = &body[range.as_range()];
    let output = stage_times.measure(Stage::Transform, || transformer.transform(chunk, &adapter))?;

    tracing::debug!(
        rank,
        start = range.start,
        end = range.end,
        blocks = range.block_count(),
        output_len = output.len(),
        "chunk transformed"
    );

    let mut counters = TelemetryCounters::default();
    counters.add_chunk(chunk.len(), output.len());
    counters.add_worker();

    Ok(RankReport { range, output, counters, stage_times })
}

fn assemble(
    job: &RankJob,
    prepared: &PreparedPayload,
    iv: Option<Iv>,
    reports: Vec<RankOutcome>,
) -> Result<AssembledPayload, PipelineError> {
    let mut counters = TelemetryCounters::default();
    let mut stage_times = StageTimes::default();

    let assemble_start = Instant::now();
    let prefix = match (job.operation, iv) {
        (Operation::Encrypt, Some(iv)) => Some(iv),
        _ => None,
    };
    let mut bytes = Vec::with_capacity(prepared.body.len() + prefix.map_or(0, |_| IV_LEN));
    if let Some(iv) = prefix {
        bytes.extend_from_slice(iv.as_bytes());
    }

    let mut expected_start = 0;
    for outcome in reports {
        let report = outcome?;
        if report.range.start != expected_start {
            return Err(PipelineError::Validation(format!(
                "rank {} chunk starts at {}, expected {}",
                report.range.rank, report.range.start, expected_start
            )));
        }
        expected_start = report.range.end;

        bytes.extend_from_slice(&report.output);
        counters.merge(&report.counters);
        stage_times.merge(&report.stage_times);
    }
    if expected_start != prepared.body.len() {
        return Err(PipelineError::Validation(format!(
            "gathered chunks cover {expected_start} of {} bytes",
            prepared.body.len()
        )));
    }
    stage_times.add(Stage::Assemble, assemble_start.elapsed());

    if iv.is_some() {
        counters.add_iv(IV_LEN);
    }

    let bytes = match job.operation {
        Operation::Encrypt => {
            counters.add_padding(prepared.padding_added);
            bytes
        }
        Operation::Decrypt => {
            let before = bytes.len();
            let plain = stage_times.measure(Stage::Unpad, || unpad(bytes, job.padding))?;
            counters.add_padding(before - plain.len());
            plain
        }
    };

    Ok(AssembledPayload { bytes, iv, counters, stage_times })
}
