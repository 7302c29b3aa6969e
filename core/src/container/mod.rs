//! container/mod.rs
//! BMP container collaborator: locate the pixel payload, keep everything before it verbatim.
//!
//! Notes:
//! - Payload is `[data_offset, EOF)`. Anything after the pixel array (rare
//!   trailing metadata) is treated as payload too.
//! - `reassemble` never rewrites header fields, even when the processed payload
//!   length differs from the input payload (padding, IV prefix).

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;

use bytes::Bytes;

/// A BMP file split into its untouched prefix and its pixel payload.
#[derive(Debug, Clone)]
pub struct BmpImage {
    pub header: BmpHeader,
    /// Bytes `[0, data_offset)`, copied verbatim into the output.
    pub prefix: Bytes,
    /// Bytes `[data_offset, EOF)`.
    pub payload: Bytes,
}

impl BmpImage {
    /// Zero-copy split of a whole BMP file.
    pub fn parse(file: Bytes) -> Result<Self, ContainerError> {
        let header = decode_bmp_header(&file)?;
        let offset = header.data_offset as usize;

        tracing::info!(
            width = header.width,
            height = header.height,
            bits_per_pixel = header.bits_per_pixel,
            payload_len = file.len() - offset,
            "parsed BMP container"
        );

        Ok(Self {
            header,
            prefix: file.slice(..offset),
            payload: file.slice(offset..),
        })
    }

    /// Prefix followed by the processed payload.
    pub fn reassemble(&self, processed: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + processed.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(processed);
        out
    }
}
