// ## 📂 File: `src/crypto/padding.rs`

//! crypto/padding.rs
//! Block padding codec (PKCS#7 byte values, 16-byte blocks).
//!
//! Design:
//! - `pad` always appends 1..=16 bytes, each equal to the pad length, so an
//!   already aligned payload still grows by one full block.
//! - `unpad` behaviour on malformed trailing bytes is an explicit policy.
//!
//! Security notes:
//! - Padding is not authentication. `PassThroughOnInvalid` returns whatever the
//!   cipher produced when the tail does not look like padding, which makes a
//!   wrong key or a tampered payload indistinguishable from a valid one.

use thiserror::Error;

use crate::constants::BLOCK_SIZE;

/// What `unpad` does when the trailing bytes are not valid padding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
    /// Return the data unmodified. No error is raised.
    #[default]
    PassThroughOnInvalid,
    /// Reject with `PaddingError::InvalidPadding`.
    Strict,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaddingError {
    #[error("invalid padding: pad byte {pad_byte} over {len} bytes")]
    InvalidPadding { pad_byte: u8, len: usize },
}

/// Pad length that `pad` will append for a payload of `len` bytes (1..=16).
#[inline]
pub fn pad_len_for(len: usize) -> usize {
    BLOCK_SIZE - (len % BLOCK_SIZE)
}

/// Append `n` bytes of value `n`. The result is a positive multiple of 16.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let n = pad_len_for(data.len());
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Returns the pad length if the tail of `data` is well-formed padding.
pub fn check_padding(data: &[u8]) -> Option<usize> {
    let &last = data.last()?;
    let n = last as usize;
    if n == 0 || n > BLOCK_SIZE || n > data.len() {
        return None;
    }
    data[data.len() - n..]
        .iter()
        .all(|&b| b == last)
        .then_some(n)
}

/// Strip padding according to `policy`.
pub fn unpad(mut data: Vec<u8>, policy: PaddingPolicy) -> Result<Vec<u8>, PaddingError> {
    match check_padding(&data) {
        Some(n) => {
            data.truncate(data.len() - n);
            Ok(data)
        }
        None => match policy {
            PaddingPolicy::PassThroughOnInvalid => {
                tracing::warn!(len = data.len(), "trailing padding invalid, returning payload as-is");
                Ok(data)
            }
            PaddingPolicy::Strict => Err(PaddingError::InvalidPadding {
                pad_byte: data.last().copied().unwrap_or(0),
                len: data.len(),
            }),
        },
    }
}
