//! Payload header detection.
//!
//! A compressed payload starts with an 8-byte header: a 4-byte big-endian
//! magic whose folded value is [`COMPRESSED_MAGIC`], followed by the
//! little-endian decompressed size XORed with a key derived from that magic.
//! Anything else is a raw payload.

use dirpak_common::BinaryReader;
use zerocopy::byteorder::{big_endian, little_endian};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{Error, Result};

/// Folded magic marking a compressed payload.
pub const COMPRESSED_MAGIC: u32 = 0x7A_33_0E;

/// On-disk layout of a compressed payload header.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct RawEntryHeader {
    /// Magic, stored big-endian.
    pub magic: big_endian::U32,
    /// Decompressed size XORed with the magic-derived key.
    pub obfuscated_size: little_endian::U32,
}

impl RawEntryHeader {
    /// Header size in bytes; the zlib stream starts right after it.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Result of inspecting the start of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryHeader {
    /// One prefix byte followed by the file content.
    Raw,
    /// Zlib stream after the 8-byte header.
    Compressed {
        /// Advisory decompressed size.
        original_size: u32,
    },
}

impl EntryHeader {
    /// Whether the payload is compressed.
    #[inline]
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }

    /// Decompressed size announced by the header, if compressed.
    #[inline]
    pub fn original_size(&self) -> Option<u32> {
        match *self {
            Self::Compressed { original_size } => Some(original_size),
            Self::Raw => None,
        }
    }
}

/// Fold a raw big-endian magic down to the 24-bit value compared against
/// [`COMPRESSED_MAGIC`].
#[inline]
pub fn fold_magic(raw_magic: u32) -> u32 {
    (raw_magic ^ (raw_magic >> 8)) & 0xFF_FFFF
}

/// Derive the 32-bit size key from a folded magic.
///
/// The low byte is taken as signed and shifted with sign extension, so for
/// bytes `>= 0x80` this is not a plain bit rotation.
#[inline]
pub fn xor_key_from_magic(magic: u32) -> u32 {
    let x = i32::from(magic as u8 as i8);
    let rotated = ((x << 5) | (x >> 3)) & 0xFF;
    rotated as u32 * 0x0101_0101
}

/// Inspect the first bytes of a payload.
///
/// Payloads shorter than 4 bytes or with a different magic are raw. A
/// matching magic without room for the size field is an error.
pub fn decode_header(data: &[u8]) -> Result<EntryHeader> {
    let mut reader = BinaryReader::new(data);
    let Ok(raw_magic) = reader.peek_u32_be() else {
        return Ok(EntryHeader::Raw);
    };

    let magic = fold_magic(raw_magic);
    if magic != COMPRESSED_MAGIC {
        return Ok(EntryHeader::Raw);
    }

    let header: RawEntryHeader = reader
        .read_struct()
        .map_err(|_| Error::TruncatedHeader(data.len()))?;
    let original_size = header.obfuscated_size.get() ^ xor_key_from_magic(magic);

    Ok(EntryHeader::Compressed { original_size })
}
