use std::io;

use crate::{
    container::ContainerError,
    crypto::{CryptoError, PaddingError},
    engine::{planner::PlanError, runtime::RuntimeError},
};

/// Unified pipeline error covering I/O, crypto, padding, planning, container, and runtime.
/// - Ergonomic `From<T>` impls enable `?` across the pipeline.
/// - Messages aim to be stable and contextual for logs and CLI output.
#[derive(Debug)]
pub enum PipelineError {
    /// I/O error reading the input or writing the output.
    Io(io::Error),

    /// Cryptographic error (key, IV, block, primitive).
    Crypto(CryptoError),

    /// Padding rejected under the strict policy.
    Padding(PaddingError),

    /// Chunk planning error.
    Plan(PlanError),

    /// Container (BMP) format error.
    Container(ContainerError),

    /// Worker-group runtime error (broadcast, gather, panic).
    Runtime(RuntimeError),

    /// Generic high-level validation with a descriptive message.
    Validation(String),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
            PipelineError::Crypto(e) => write!(f, "crypto error: {}", e),
            PipelineError::Padding(e) => write!(f, "padding error: {}", e),
            PipelineError::Plan(e) => write!(f, "plan error: {}", e),
            PipelineError::Container(e) => write!(f, "container error: {}", e),
            PipelineError::Runtime(e) => write!(f, "runtime error: {}", e),
            PipelineError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::Crypto(e) => Some(e),
            PipelineError::Padding(e) => Some(e),
            PipelineError::Plan(e) => Some(e),
            PipelineError::Container(e) => Some(e),
            PipelineError::Runtime(e) => Some(e),
            PipelineError::Validation(_) => None,
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(e: io::Error) -> Self {
        PipelineError::Io(e)
    }
}

impl From<CryptoError> for PipelineError {
    fn from(e: CryptoError) -> Self {
        PipelineError::Crypto(e)
    }
}

impl From<PaddingError> for PipelineError {
    fn from(e: PaddingError) -> Self {
        PipelineError::Padding(e)
    }
}

impl From<PlanError> for PipelineError {
    fn from(e: PlanError) -> Self {
        PipelineError::Plan(e)
    }
}

impl From<ContainerError> for PipelineError {
    fn from(e: ContainerError) -> Self {
        PipelineError::Container(e)
    }
}

impl From<RuntimeError> for PipelineError {
    fn from(e: RuntimeError) -> Self {
        PipelineError::Runtime(e)
    }
}
