// ## 📂 File: `src/container/types.rs`

//! container/types.rs
//! BMP header as an explicit field list with fixed little-endian offsets.
//!
//! Layout (54 bytes, all little-endian):
//!
//! | Offset | Size | Field            |
//! | ------ | ---- | ---------------- |
//! | 0      | 2    | signature ("BM") |
//! | 2      | 4    | file_size        |
//! | 6      | 2    | reserved1        |
//! | 8      | 2    | reserved2        |
//! | 10     | 4    | data_offset      |
//! | 14     | 4    | header_size      |
//! | 18     | 4    | width (i32)      |
//! | 22     | 4    | height (i32)     |
//! | 26     | 2    | planes           |
//! | 28     | 2    | bits_per_pixel   |
//! | 30     | 4    | compression      |
//! | 34     | 4    | image_size       |
//! | 38     | 4    | x_resolution     |
//! | 42     | 4    | y_resolution     |
//! | 46     | 4    | colors_used      |
//! | 50     | 4    | important_colors |

use thiserror::Error;

use crate::constants::bmp;

/// Byte offsets of every header field.
pub mod offsets {
    pub const SIGNATURE: usize = 0;
    pub const FILE_SIZE: usize = 2;
    pub const RESERVED1: usize = 6;
    pub const RESERVED2: usize = 8;
    pub const DATA_OFFSET: usize = 10;
    pub const HEADER_SIZE: usize = 14;
    pub const WIDTH: usize = 18;
    pub const HEIGHT: usize = 22;
    pub const PLANES: usize = 26;
    pub const BITS_PER_PIXEL: usize = 28;
    pub const COMPRESSION: usize = 30;
    pub const IMAGE_SIZE: usize = 34;
    pub const X_RESOLUTION: usize = 38;
    pub const Y_RESOLUTION: usize = 42;
    pub const COLORS_USED: usize = 46;
    pub const IMPORTANT_COLORS: usize = 50;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub signature: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub data_offset: u32,
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl BmpHeader {
    pub const LEN: usize = bmp::HEADER_LEN;

    /// Minimal 24-bit header for a `width` x `height` image with pixels right after the header.
    pub fn new_rgb24(width: i32, height: i32, pixel_bytes: u32) -> Self {
        Self {
            signature: bmp::SIGNATURE,
            file_size: Self::LEN as u32 + pixel_bytes,
            reserved1: 0,
            reserved2: 0,
            data_offset: Self::LEN as u32,
            header_size: 40,
            width,
            height,
            planes: 1,
            bits_per_pixel: 24,
            compression: 0,
            image_size: pixel_bytes,
            x_resolution: 2835,
            y_resolution: 2835,
            colors_used: 0,
            important_colors: 0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("file too small to be a valid BMP: have {have} bytes, need {need}")]
    TooSmall { have: usize, need: usize },

    #[error("not a valid BMP file: signature 0x{found:04x}")]
    BadSignature { found: u16 },

    #[error("pixel data offset {offset} lies beyond end of file ({len} bytes)")]
    DataOffsetOutOfRange { offset: usize, len: usize },
}
