// ## 📂 File: `src/engine/core.rs`
// ## Stable public API

//! Entry points used by the CLI, tests, and benches.
//!
//! - `process_payload`: raw payload in, transformed payload out.
//! - `process_image`: whole BMP file in, whole BMP file out (header verbatim).
//! - `process_io` / `process_file`: read, process, write only on success.

use std::path::Path;

use bytes::Bytes;

use crate::constants::ASSEMBLER_RANK;
use crate::container::{BmpHeader, BmpImage};
use crate::crypto::{CipherMode, Iv, Key, Operation, PaddingPolicy};
use crate::engine::coordinator::{prepare_payload, run_rank, RankJob, RankOutcome};
use crate::engine::io::{read_input, write_output, InputSource, OutputSink};
use crate::engine::parallelism::ParallelismProfile;
use crate::engine::runtime::{LocalCluster, ThreadComm};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::PipelineError;

/// What to do with the payload.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub operation: Operation,
    pub mode: CipherMode,
    pub key: Key,
    pub padding: PaddingPolicy,
}

impl OperationRequest {
    /// Request using the default padding policy.
    pub fn new(operation: Operation, mode: CipherMode, key: Key) -> Self {
        Self { operation, mode, key, padding: PaddingPolicy::default() }
    }

    pub fn with_padding(mut self, padding: PaddingPolicy) -> Self {
        self.padding = padding;
        self
    }
}

#[derive(Debug)]
pub struct ProcessedPayload {
    pub bytes: Vec<u8>,
    /// IV used for CBC (generated on encrypt, read from the input on decrypt).
    pub iv: Option<Iv>,
    pub counters: TelemetryCounters,
    pub timer: TelemetryTimer,
}

impl ProcessedPayload {
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

#[derive(Debug)]
pub struct ProcessedImage {
    pub header: BmpHeader,
    /// Original header bytes followed by the processed payload.
    pub bytes: Vec<u8>,
    pub iv: Option<Iv>,
    pub counters: TelemetryCounters,
    pub timer: TelemetryTimer,
}

impl ProcessedImage {
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

/// Transform a raw payload across `profile.workers` ranks.
pub fn process_payload(
    payload: Bytes,
    request: &OperationRequest,
    profile: &ParallelismProfile,
) -> Result<ProcessedPayload, PipelineError> {
    profile.validate()?;

    let span = tracing::info_span!(
        "operation",
        operation = %request.operation,
        mode = %request.mode,
        workers = profile.workers,
        threads = profile.threads_per_worker,
    );
    let _guard = span.enter();

    let mut timer = TelemetryTimer::new();
    let input_len = payload.len();

    let prepared = timer
        .stage_times
        .measure(Stage::Prepare, || prepare_payload(payload, request.operation, request.mode))?;

    let job = RankJob {
        operation: request.operation,
        mode: request.mode,
        key: request.key.clone(),
        padding: request.padding,
        threads_per_worker: profile.threads_per_worker,
    };

    let cluster = LocalCluster::new(profile.workers)?;
    let results = cluster.run(|comm: ThreadComm<RankOutcome>| run_rank(&comm, &job, &prepared))?;

    let assembled = results
        .into_iter()
        .nth(ASSEMBLER_RANK)
        .ok_or_else(|| PipelineError::Validation("assembler rank missing".into()))??
        .ok_or_else(|| PipelineError::Validation("assembler produced no output".into()))?;

    timer.stage_times.merge(&assembled.stage_times);
    timer.finish();

    tracing::info!(
        input_len,
        output_len = assembled.bytes.len(),
        blocks = assembled.counters.blocks,
        elapsed_ms = timer.elapsed().as_secs_f64() * 1_000.0,
        "payload processed"
    );

    Ok(ProcessedPayload {
        bytes: assembled.bytes,
        iv: assembled.iv,
        counters: assembled.counters,
        timer,
    })
}

/// Parse a BMP file, transform its pixel payload, and reattach the original header bytes.
pub fn process_image(
    file: Bytes,
    request: &OperationRequest,
    profile: &ParallelismProfile,
) -> Result<ProcessedImage, PipelineError> {
    let image = BmpImage::parse(file)?;
    let processed = process_payload(image.payload.clone(), request, profile)?;
    let bytes = image.reassemble(&processed.bytes);

    Ok(ProcessedImage {
        header: image.header,
        bytes,
        iv: processed.iv,
        counters: processed.counters,
        timer: processed.timer,
    })
}

/// Result of `process_io`.
#[derive(Debug)]
pub struct IoOutcome {
    pub telemetry: TelemetrySnapshot,
    /// Output bytes when the sink was `OutputSink::Memory`.
    pub output: Option<Vec<u8>>,
}

/// Read a BMP from `input`, process it, and write the result to `output`.
///
/// Nothing is written unless every stage succeeded.
pub fn process_io(
    input: InputSource,
    output: OutputSink,
    request: &OperationRequest,
    profile: &ParallelismProfile,
) -> Result<IoOutcome, PipelineError> {
    let mut read_timer = TelemetryTimer::new();
    let file = read_timer.stage_times.measure(Stage::Read, || read_input(input))?;

    let mut image = process_image(file, request, profile)?;
    image.timer.start_time = read_timer.start_time;
    image.timer.stage_times.merge(&read_timer.stage_times);

    let bytes = std::mem::take(&mut image.bytes);
    let output = image
        .timer
        .stage_times
        .measure(Stage::Write, || write_output(output, bytes))?;
    image.timer.finish();

    Ok(IoOutcome { telemetry: image.snapshot(), output })
}

/// File-to-file convenience wrapper over `process_io`.
pub fn process_file(
    input: &Path,
    output: &Path,
    request: &OperationRequest,
    profile: &ParallelismProfile,
) -> Result<TelemetrySnapshot, PipelineError> {
    let outcome = process_io(
        InputSource::File(input.to_path_buf()),
        OutputSink::File(output.to_path_buf()),
        request,
        profile,
    )?;
    Ok(outcome.telemetry)
}
