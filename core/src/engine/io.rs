// ## 📂 File: `src/engine/io.rs`
// ## Normalized input/output for whole-file operations

//! The whole input is resident in memory before any rank starts, and the
//! output is written once, after the assembler has produced the final bytes.
//! File sinks are written to a `.partial` sibling and renamed into place, so a
//! failed or interrupted run never leaves a truncated output behind.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::types::PipelineError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Bytes),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Hand the bytes back to the caller.
    Memory,
}

/// Read the whole input into memory.
pub fn read_input(src: InputSource) -> Result<Bytes, PipelineError> {
    match src {
        InputSource::Memory(b) => Ok(b),
        InputSource::File(p) => {
            let data = fs::read(&p)?;
            tracing::debug!(path = %p.display(), len = data.len(), "input read");
            Ok(Bytes::from(data))
        }
        InputSource::Reader(mut r) => {
            let mut data = Vec::new();
            r.read_to_end(&mut data)?;
            Ok(Bytes::from(data))
        }
    }
}

/// Write the final output. Returns the bytes for `OutputSink::Memory`.
pub fn write_output(sink: OutputSink, bytes: Vec<u8>) -> Result<Option<Vec<u8>>, PipelineError> {
    match sink {
        OutputSink::Memory => Ok(Some(bytes)),
        OutputSink::Writer(mut w) => {
            w.write_all(&bytes)?;
            w.flush()?;
            Ok(None)
        }
        OutputSink::File(p) => {
            write_file_atomic(&p, &bytes)?;
            tracing::debug!(path = %p.display(), len = bytes.len(), "output written");
            Ok(None)
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_file_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = partial_path(path);

    let result = File::create(&tmp).and_then(|mut f| {
        f.write_all(bytes)?;
        f.sync_all()
    });
    if let Err(e) = result.and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
