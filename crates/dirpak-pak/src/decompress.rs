//! Decompression utilities for pak payloads.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::{Error, Result};

/// Upper bound on the buffer reserved up front from an advisory size.
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

/// Decompress zlib-wrapped DEFLATE data.
pub fn decompress_zlib(data: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let mut decoder = ZlibDecoder::new(data);

    output.clear();
    decoder
        .read_to_end(output)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(())
}

/// Decompress zlib data, reserving room for the expected size.
pub fn decompress_zlib_sized(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size.min(MAX_PREALLOCATION));
    decompress_zlib(data, &mut output)?;
    Ok(output)
}
