// ## 📂 File: `src/crypto/types.rs`

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{BLOCK_SIZE, IV_LEN, KEY_LEN};

/// Block chaining mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CipherMode {
    /// Every block transformed on its own, no chain input.
    Ecb,
    /// Every block seeded with the same stream IV (see `crypto::block`).
    Cbc,
}

impl CipherMode {
    pub fn uses_iv(self) -> bool {
        matches!(self, CipherMode::Cbc)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Ecb => f.write_str("ECB"),
            CipherMode::Cbc => f.write_str("CBC"),
        }
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    /// Exact, upper-case names only: `ECB` or `CBC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ECB" => Ok(CipherMode::Ecb),
            "CBC" => Ok(CipherMode::Cbc),
            other => Err(CryptoError::UnsupportedMode(other.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Encrypt => f.write_str("encrypt"),
            Operation::Decrypt => f.write_str("decrypt"),
        }
    }
}

impl FromStr for Operation {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encrypt" => Ok(Operation::Encrypt),
            "decrypt" => Ok(Operation::Decrypt),
            other => Err(CryptoError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// AES-256 key material. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Key(bytes)
    }

    /// Boundary normalisation: zero-pad short passphrases, truncate long ones.
    pub fn from_passphrase(passphrase: &[u8]) -> Self {
        let mut key = [0u8; KEY_LEN];
        let n = passphrase.len().min(KEY_LEN);
        key[..n].copy_from_slice(&passphrase[..n]);
        Key(key)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(<redacted>)")
    }
}

/// CBC initialization vector.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Iv([u8; IV_LEN]);

impl Iv {
    pub fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Iv(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; IV_LEN] = bytes.try_into().map_err(|_| CryptoError::InvalidIvLen {
            expected: IV_LEN,
            actual: bytes.len(),
        })?;
        Ok(Iv(arr))
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

impl fmt::Debug for Iv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iv({})", hex::encode(self.0))
    }
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    #[error("invalid IV length: expected={expected}, actual={actual}")]
    InvalidIvLen { expected: usize, actual: usize },

    #[error("{mode} mode requires an IV")]
    MissingIv { mode: CipherMode },

    #[error("invalid block length: expected={expected}, actual={actual}", expected = BLOCK_SIZE)]
    InvalidBlockLen { actual: usize },

    #[error("input of {len} bytes is not a whole number of {block}-byte blocks", block = BLOCK_SIZE)]
    UnalignedInput { len: usize },

    #[error("ciphertext of {len} bytes is shorter than the {iv}-byte IV", iv = IV_LEN)]
    TruncatedCiphertext { len: usize },

    #[error("unsupported mode: {0:?} (expected ECB or CBC)")]
    UnsupportedMode(String),

    #[error("unsupported operation: {0:?} (expected encrypt or decrypt)")]
    UnsupportedOperation(String),

    #[error("random IV generation failed: {0}")]
    Randomness(String),

    #[error("crypto failure: {0}")]
    Failure(String),
}
