//! Zlib compression and decompression at the storage boundary.

use crate::error::{Error, Result};

/// Compression level used for loose objects (zlib default).
const COMPRESSION_LEVEL: u8 = 6;

/// Compresses data with a zlib wrapper (header and Adler-32 checksum).
pub fn compress(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, COMPRESSION_LEVEL)
}

/// Decompresses zlib-compressed data.
///
/// The two-byte zlib header is validated up front so that garbage files in
/// the object directory fail with `DecompressionFailed` rather than being
/// partially inflated.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < 2 || !is_valid_zlib_header(data[0], data[1]) {
        return Err(Error::DecompressionFailed);
    }

    miniz_oxide::inflate::decompress_to_vec_zlib(data).map_err(|_| Error::DecompressionFailed)
}

/// Validates the CMF/FLG byte pair of a zlib stream.
///
/// Compression method must be 8 (DEFLATE), the window size at most 7,
/// and `(CMF * 256 + FLG) % 31 == 0`.
fn is_valid_zlib_header(cmf: u8, flg: u8) -> bool {
    if cmf & 0x0F != 8 {
        return false;
    }
    if cmf >> 4 > 7 {
        return false;
    }
    (u16::from(cmf) * 256 + u16::from(flg)) % 31 == 0
}
