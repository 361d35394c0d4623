//! Payload decoding.

use crate::decompress;
use crate::header::{decode_header, EntryHeader, RawEntryHeader};
use crate::Result;

/// Decode a payload slice read from the container.
///
/// Compressed payloads are inflated from byte 8 onward. Raw payloads lose
/// their first byte, a prefix that every raw entry carries.
pub fn decode_file_content(data: &[u8]) -> Result<Vec<u8>> {
    match decode_header(data)? {
        EntryHeader::Compressed { original_size } => {
            let output = decompress::decompress_zlib_sized(
                &data[RawEntryHeader::SIZE..],
                original_size as usize,
            )?;
            if output.len() != original_size as usize {
                log::warn!(
                    "header announces {} bytes but stream inflated to {}",
                    original_size,
                    output.len()
                );
            }
            Ok(output)
        }
        EntryHeader::Raw => Ok(data.get(1..).unwrap_or_default().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::tests::compressed_header;
    use crate::Error;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_raw_drops_first_byte() {
        assert_eq!(decode_file_content(b"\x01hello").unwrap(), b"hello");
        assert_eq!(decode_file_content(b"\xFF\x00\x01").unwrap(), [0x00, 0x01]);
    }

    #[test]
    fn test_raw_short_payloads() {
        assert!(decode_file_content(&[]).unwrap().is_empty());
        assert!(decode_file_content(&[0x01]).unwrap().is_empty());
        assert_eq!(decode_file_content(&[0x01, 0x7A, 0x49]).unwrap(), [0x7A, 0x49]);
    }

    #[test]
    fn test_compressed_payload() {
        let mut data = compressed_header(0x00, 5).to_vec();
        data.extend_from_slice(&zlib(b"world"));
        assert_eq!(decode_file_content(&data).unwrap(), b"world");
    }

    #[test]
    fn test_wrong_advisory_size_is_not_an_error() {
        let mut data = compressed_header(0x42, 9999).to_vec();
        data.extend_from_slice(&zlib(b"world"));
        assert_eq!(decode_file_content(&data).unwrap(), b"world");
    }

    #[test]
    fn test_inflate_starts_after_header() {
        // The header itself is not a zlib stream; if inflate began at byte 0
        // or 4 this would fail.
        let mut data = compressed_header(0x9C, 3).to_vec();
        data.extend_from_slice(&zlib(b"abc"));
        assert_eq!(decode_file_content(&data).unwrap(), b"abc");
    }

    #[test]
    fn test_corrupt_compressed_payload() {
        let mut data = compressed_header(0x00, 5).to_vec();
        data.extend_from_slice(&[0xFF; 12]);
        assert!(matches!(
            decode_file_content(&data),
            Err(Error::Decompression(_))
        ));
    }
}
