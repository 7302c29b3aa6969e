//! pixcrypt-core
//!
//! Parallel AES-256 ECB/CBC transformation of BMP pixel payloads.
//! The header is carried through verbatim; only the pixel data is transformed.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod container;
pub mod crypto;
pub mod telemetry;

// Worker group, planning, and public entry points
pub mod engine;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::crypto::{CipherMode, Key, Operation, PaddingPolicy};
    pub use crate::engine::{
        process_file, process_image, process_io, process_payload, InputSource, OperationRequest,
        OutputSink, ParallelismProfile,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::PipelineError;
}
