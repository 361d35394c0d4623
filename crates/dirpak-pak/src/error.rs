//! Error types for the pak crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading a `.dir`/`.pak` archive.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dir table could not be decoded.
    #[error("{0}")]
    Dir(#[from] dirpak_dir::Error),

    /// The payload carries the compression magic but is too short for the size field.
    #[error("compressed payload header truncated: {0} bytes")]
    TruncatedHeader(usize),

    /// An entry's byte range lies outside the container.
    #[error("entry {path:?} spans {offset}..{end} but the container is {container_len} bytes")]
    EntryOutOfBounds {
        path: String,
        offset: u64,
        end: u64,
        container_len: u64,
    },

    /// An entry path would escape the extraction root.
    #[error("refusing to extract {0:?} outside the destination")]
    UnsafePath(String),

    /// Entry not found.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// No archive filename was supplied.
    #[error("need at least one of a .dir, .pak or base filename")]
    Usage,

    /// Extraction of one entry failed inside a batch.
    #[error("failed to extract {entry:?} to {}: {source}", .dest.display())]
    Extract {
        entry: String,
        dest: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed dir table, header or entry range.
    Format,
    /// Lookup of an unknown path.
    NotFound,
    /// Underlying read, seek or write failure.
    Io,
    /// Corrupt compressed stream.
    Decompression,
    /// Invalid arguments from the caller.
    Usage,
}

impl Error {
    /// Get the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::Dir(dirpak_dir::Error::Io(_)) => ErrorKind::Io,
            Self::Dir(_)
            | Self::TruncatedHeader(_)
            | Self::EntryOutOfBounds { .. }
            | Self::UnsafePath(_) => ErrorKind::Format,
            Self::EntryNotFound(_) => ErrorKind::NotFound,
            Self::Decompression(_) => ErrorKind::Decompression,
            Self::Usage => ErrorKind::Usage,
            Self::Extract { source, .. } => source.kind(),
        }
    }
}

/// Result type for pak operations.
pub type Result<T> = std::result::Result<T, Error>;
