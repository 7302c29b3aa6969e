//! Protocol and sizing constants shared across layers.

/// AES block size in bytes. Every chunk seam and every cipher call is aligned to it.
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes (one block).
pub const IV_LEN: usize = BLOCK_SIZE;

/// Accepted passphrase length bounds at the CLI boundary (characters).
pub const MIN_KEY_CHARS: usize = 16;
pub const MAX_KEY_CHARS: usize = 32;

/// Upper bound on the worker group size.
pub const MAX_WORKERS: usize = 256;

/// Rank that generates the IV, receives the gather, and produces the final output.
pub const ASSEMBLER_RANK: usize = 0;

/// BMP container constants.
pub mod bmp {
    /// "BM" read as a little-endian u16.
    pub const SIGNATURE: u16 = 0x4D42;
    /// BITMAPFILEHEADER (14) + BITMAPINFOHEADER (40).
    pub const HEADER_LEN: usize = 54;
}
