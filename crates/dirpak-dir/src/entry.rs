//! Dir table entry.

use std::path::PathBuf;

/// A file within the archive: its path and the byte range holding its
/// payload in the companion `.pak` container.
///
/// This contains metadata about the file, not the file data itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirEntry {
    /// File path within the archive (ASCII).
    path: String,
    /// Absolute byte offset of the payload in the container.
    offset: u32,
    /// Length of the payload in bytes, including any header.
    length: u32,
}

impl DirEntry {
    /// Create a new entry.
    pub fn new(path: impl Into<String>, offset: u32, length: u32) -> Self {
        Self {
            path: path.into(),
            offset,
            length,
        }
    }

    /// Get the file path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the payload offset in the container.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Get the payload length in bytes.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// End of the payload range (exclusive), widened so it cannot overflow.
    #[inline]
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }

    /// Get the relative output path for extraction.
    ///
    /// Backslash separators are normalized to forward slashes.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.path.replace('\\', "/"))
    }
}
