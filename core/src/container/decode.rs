// ## 📂 File: `src/container/decode.rs`

//! container/decode.rs
//!
//! Design notes:
//! - Every field is read at its documented offset; nothing depends on in-memory
//!   struct layout.
//! - Only the signature and the pixel data offset are validated, the remaining
//!   fields are carried for logging.

use byteorder::{ByteOrder, LittleEndian as LE};

use crate::constants::bmp;
use crate::container::types::{offsets, BmpHeader, ContainerError};

/// Decode the 54-byte BMP header at the start of `buf`.
pub fn decode_bmp_header(buf: &[u8]) -> Result<BmpHeader, ContainerError> {
    if buf.len() < BmpHeader::LEN {
        return Err(ContainerError::TooSmall { have: buf.len(), need: BmpHeader::LEN });
    }

    let u16_at = |off: usize| LE::read_u16(&buf[off..off + 2]);
    let u32_at = |off: usize| LE::read_u32(&buf[off..off + 4]);
    let i32_at = |off: usize| LE::read_i32(&buf[off..off + 4]);

    let signature = u16_at(offsets::SIGNATURE);
    if signature != bmp::SIGNATURE {
        return Err(ContainerError::BadSignature { found: signature });
    }

    let h = BmpHeader {
        signature,
        file_size:        u32_at(offsets::FILE_SIZE),
        reserved1:        u16_at(offsets::RESERVED1),
        reserved2:        u16_at(offsets::RESERVED2),
        data_offset:      u32_at(offsets::DATA_OFFSET),
        header_size:      u32_at(offsets::HEADER_SIZE),
        width:            i32_at(offsets::WIDTH),
        height:           i32_at(offsets::HEIGHT),
        planes:           u16_at(offsets::PLANES),
        bits_per_pixel:   u16_at(offsets::BITS_PER_PIXEL),
        compression:      u32_at(offsets::COMPRESSION),
        image_size:       u32_at(offsets::IMAGE_SIZE),
        x_resolution:     i32_at(offsets::X_RESOLUTION),
        y_resolution:     i32_at(offsets::Y_RESOLUTION),
        colors_used:      u32_at(offsets::COLORS_USED),
        important_colors: u32_at(offsets::IMPORTANT_COLORS),
    };

    let offset = h.data_offset as usize;
    if offset > buf.len() {
        return Err(ContainerError::DataOffsetOutOfRange { offset, len: buf.len() });
    }

    Ok(h)
}
