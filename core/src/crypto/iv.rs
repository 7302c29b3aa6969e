// ## 📂 File: `src/crypto/iv.rs`

//! crypto/iv.rs
//! IV generation and extraction for CBC mode.
//!
//! Design:
//! - Encryption: one IV per whole-payload operation, drawn from the OS CSPRNG on
//!   the assembler rank and broadcast to every worker before chunking.
//! - Decryption: the IV is the first block of the ciphertext payload.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::IV_LEN;
use crate::crypto::types::{CryptoError, Iv};

/// Draw a fresh IV from the operating system RNG.
pub fn generate_iv() -> Result<Iv, CryptoError> {
    let mut bytes = [0u8; IV_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Randomness(e.to_string()))?;
    Ok(Iv::from_bytes(bytes))
}

/// Split a CBC ciphertext payload into its leading IV and the remaining body.
///
/// Returns `None` when the payload is shorter than one IV.
pub fn split_iv(payload: &[u8]) -> Option<(Iv, &[u8])> {
    if payload.len() < IV_LEN {
        return None;
    }
    let (head, body) = payload.split_at(IV_LEN);
    Iv::from_slice(head).ok().map(|iv| (iv, body))
}
