// ## 📂 File: `src/container/encode.rs`

use byteorder::{ByteOrder, LittleEndian as LE};

use crate::container::types::{offsets, BmpHeader};

/// Serialize a `BmpHeader` into its 54-byte little-endian form.
pub fn encode_bmp_header(h: &BmpHeader) -> [u8; BmpHeader::LEN] {
    let mut out = [0u8; BmpHeader::LEN];

    LE::write_u16(&mut out[offsets::SIGNATURE..], h.signature);
    LE::write_u32(&mut out[offsets::FILE_SIZE..], h.file_size);
    LE::write_u16(&mut out[offsets::RESERVED1..], h.reserved1);
    LE::write_u16(&mut out[offsets::RESERVED2..], h.reserved2);
    LE::write_u32(&mut out[offsets::DATA_OFFSET..], h.data_offset);
    LE::write_u32(&mut out[offsets::HEADER_SIZE..], h.header_size);
    LE::write_i32(&mut out[offsets::WIDTH..], h.width);
    LE::write_i32(&mut out[offsets::HEIGHT..], h.height);
    LE::write_u16(&mut out[offsets::PLANES..], h.planes);
    LE::write_u16(&mut out[offsets::BITS_PER_PIXEL..], h.bits_per_pixel);
    LE::write_u32(&mut out[offsets::COMPRESSION..], h.compression);
    LE::write_u32(&mut out[offsets::IMAGE_SIZE..], h.image_size);
    LE::write_i32(&mut out[offsets::X_RESOLUTION..], h.x_resolution);
    LE::write_i32(&mut out[offsets::Y_RESOLUTION..], h.y_resolution);
    LE::write_u32(&mut out[offsets::COLORS_USED..], h.colors_used);
    LE::write_u32(&mut out[offsets::IMPORTANT_COLORS..], h.important_colors);

    out
}

/// Build a complete BMP file from a header and raw pixel bytes (test fixtures, tooling).
pub fn build_bmp(h: &BmpHeader, pixels: &[u8]) -> Vec<u8> {
    let offset = h.data_offset as usize;
    let mut out = Vec::with_capacity(offset.max(BmpHeader::LEN) + pixels.len());
    out.extend_from_slice(&encode_bmp_header(h));
    out.resize(offset.max(BmpHeader::LEN), 0);
    out.extend_from_slice(pixels);
    out
}
